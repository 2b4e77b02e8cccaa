//! End-to-end conversion of an EPUB archive into a [`Book`].

use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::assemble::BookBuilder;
use crate::dom::parse_html_bytes;
use crate::epub::EpubReader;
use crate::error::Result;
use crate::extract::ExtractOptions;
use crate::model::Book;

/// Extract every spine document of `epub`, in reading order, into a [`Book`].
///
/// Tokens are left empty; run [`annotate`](crate::annotate) afterwards to fill
/// them in.
pub fn convert_epub<R: Read + Seek>(
    epub: &mut EpubReader<R>,
    options: &ExtractOptions,
) -> Result<Book> {
    let metadata = epub.metadata().clone();
    let mut builder = BookBuilder::new(metadata.title)
        .with_authors(metadata.authors)
        .with_language(metadata.language)
        .with_declared_cover(epub.cover_href().map(str::to_string))
        .with_options(options.clone());

    let count = epub.spine().len();
    for index in 0..count {
        let bytes = epub.read_document(index)?;
        debug!(
            index,
            path = %epub.spine()[index].path,
            bytes = bytes.len(),
            "reading spine document"
        );
        let tree = parse_html_bytes(&bytes);
        builder.add_document(&tree, index + 1 == count);
    }

    builder.finish()
}

/// Open the EPUB at `path` and convert it.
///
/// ```no_run
/// use yomiage::{ExtractOptions, read_book};
///
/// let book = read_book("book.epub", &ExtractOptions::default())?;
/// for chapter in &book.chapters {
///     println!("{} sections", chapter.sections.len());
/// }
/// # Ok::<(), yomiage::Error>(())
/// ```
pub fn read_book<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Book> {
    let mut epub = EpubReader::open(path)?;
    convert_epub(&mut epub, options)
}
