//! Chapter boundaries across spine documents.

use tracing::debug;

use crate::model::{Chapter, Section};
use crate::segment::{SentenceRules, sentences};

/// Whether a chapter that just received a whole document should be closed.
///
/// Only chapters holding narrative text are closed. Image-only chapters (a
/// cover page, a frontispiece) stay open so the next document's text lands
/// in the same chapter, and a chapter always starts where text starts.
pub fn closes_chapter(finished: &Chapter) -> bool {
    finished.has_text()
}

/// Owns the chapters built so far and the one currently being filled.
///
/// There is always at least one chapter.
#[derive(Debug, Clone)]
pub struct ChapterAssembler {
    chapters: Vec<Chapter>,
}

impl Default for ChapterAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterAssembler {
    pub fn new() -> Self {
        Self {
            chapters: vec![Chapter::new()],
        }
    }

    /// The chapter receiving sections.
    pub fn current(&self) -> &Chapter {
        // `chapters` is never empty.
        &self.chapters[self.chapters.len() - 1]
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn push_section(&mut self, section: Section) {
        match self.chapters.last_mut() {
            Some(chapter) => chapter.sections.push(section),
            None => self.chapters.push(Chapter {
                sections: vec![section],
            }),
        }
    }

    pub fn push_image(&mut self, image_ref: String) {
        self.push_section(Section::image(image_ref));
    }

    /// Split a paragraph into sentences and append one text section per
    /// sentence. Returns the number of sections added.
    pub fn commit_paragraph(&mut self, text: &str, rules: &SentenceRules) -> usize {
        let mut added = 0;
        for sentence in sentences(text, rules) {
            self.push_section(Section::text(sentence));
            added += 1;
        }
        added
    }

    /// Close out one spine document, opening a new chapter if the current
    /// one has text and more documents follow. Returns whether a chapter
    /// was opened.
    pub fn end_document(&mut self, is_last: bool) -> bool {
        if is_last || !closes_chapter(self.current()) {
            return false;
        }
        debug!(
            chapter = self.chapters.len(),
            sections = self.current().sections.len(),
            "chapter closed"
        );
        self.chapters.push(Chapter::new());
        true
    }

    /// Finish assembly.
    ///
    /// A trailing chapter left empty (the last documents produced nothing)
    /// is dropped, and a trailing image-only chapter is folded back into
    /// the chapter before it. A lone chapter is always kept.
    pub fn into_chapters(mut self) -> Vec<Chapter> {
        while self.chapters.len() > 1 && self.chapters.last().is_some_and(Chapter::is_empty) {
            self.chapters.pop();
        }

        if self.chapters.len() > 1
            && self.chapters.last().is_some_and(Chapter::is_image_only)
            && let Some(images) = self.chapters.pop()
            && let Some(previous) = self.chapters.last_mut()
        {
            debug!(images = images.sections.len(), "trailing images folded back");
            previous.sections.extend(images.sections);
        }

        self.chapters
    }
}
