//! Book assembly: extraction, segmentation and chapter boundaries driven
//! one spine document at a time.

mod chapters;
mod cover;

pub use chapters::{ChapterAssembler, closes_chapter};
pub use cover::choose_cover;

use tracing::{debug, info};

use crate::dom::MarkupTree;
use crate::error::{Error, Result};
use crate::extract::{Block, ExtractOptions, extract_document};
use crate::images::ImageRegistry;
use crate::model::Book;

/// Builds a [`Book`] from spine documents fed in reading order.
///
/// ```
/// use yomiage::assemble::BookBuilder;
/// use yomiage::dom::parse_html;
///
/// let mut builder = BookBuilder::new("例");
/// builder.add_document(&parse_html("<body><img src='cover.jpg'/></body>"), false);
/// builder.add_document(&parse_html("<body><p>一。二。</p></body>"), true);
///
/// let book = builder.finish()?;
/// assert_eq!(book.chapters.len(), 1);
/// assert_eq!(book.images, vec!["cover.jpg"]);
/// # Ok::<(), yomiage::Error>(())
/// ```
#[derive(Debug)]
pub struct BookBuilder {
    title: String,
    authors: Vec<String>,
    language: Option<String>,
    declared_cover: Option<String>,
    options: ExtractOptions,
    images: ImageRegistry,
    chapters: ChapterAssembler,
    documents: usize,
}

impl BookBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            language: None,
            declared_cover: None,
            options: ExtractOptions::default(),
            images: ImageRegistry::new(),
            chapters: ChapterAssembler::new(),
            documents: 0,
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Cover href declared by the package document, used as the first
    /// choice when picking the cover image.
    pub fn with_declared_cover(mut self, href: Option<String>) -> Self {
        self.declared_cover = href;
        self
    }

    /// Extract one spine document and append its sections.
    ///
    /// `is_last` tells the assembler no document follows, so no new chapter
    /// is opened after this one.
    pub fn add_document<T: MarkupTree>(&mut self, tree: &T, is_last: bool) {
        let blocks = extract_document(tree, &self.options);
        let before = self.chapters.current().sections.len();
        self.commit_blocks(blocks);
        let added = self.chapters.current().sections.len() - before;

        self.documents += 1;
        debug!(document = self.documents, sections = added, "document extracted");

        self.chapters.end_document(is_last);
    }

    /// Commit extracted blocks to the current chapter.
    pub fn commit_blocks(&mut self, blocks: Vec<Block>) {
        for block in blocks {
            match block {
                Block::Paragraph(text) => {
                    self.chapters
                        .commit_paragraph(&text, &self.options.sentence_rules);
                }
                Block::Image(href) => {
                    if let Some(name) = self.images.register(&href) {
                        self.chapters.push_image(name);
                    }
                }
            }
        }
    }

    /// Finish the book.
    ///
    /// Fails with [`Error::EmptyBook`] if no document produced a section.
    pub fn finish(self) -> Result<Book> {
        let chapters = self.chapters.into_chapters();
        if chapters.iter().all(|c| c.is_empty()) {
            return Err(Error::EmptyBook);
        }

        let images = self.images.into_names();
        let cover_image = choose_cover(&images, self.declared_cover.as_deref());

        let book = Book {
            title: self.title,
            authors: self.authors,
            language: self.language,
            cover_image,
            images,
            chapters,
        };

        info!(
            title = %book.title,
            documents = self.documents,
            chapters = book.chapters.len(),
            sections = book.section_count(),
            images = book.images.len(),
            "book assembled"
        );
        Ok(book)
    }
}
