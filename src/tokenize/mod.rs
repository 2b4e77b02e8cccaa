//! Morphological annotation of text sections.
//!
//! The analyzer itself is external: anything implementing [`Analyzer`] can be
//! plugged in (a MeCab/IPADIC binding, a dictionary-backed tokenizer, a
//! remote service). [`ScriptAnalyzer`] is a dictionary-free fallback.

mod script;

pub use script::{ScriptAnalyzer, ScriptClass};

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Book, Token};

/// One unit emitted by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    pub surface: String,
    /// Placeholder with no lexical content (BOS/EOS markers and the like).
    pub sentinel: bool,
    pub features: Vec<String>,
}

impl AnalyzedToken {
    pub fn new(surface: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            surface: surface.into(),
            sentinel: false,
            features,
        }
    }

    pub fn sentinel(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            sentinel: true,
            features: Vec::new(),
        }
    }
}

/// Failure reported by an analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("analyzer rejected input: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A morphological analyzer: text in, ordered tokens out.
pub trait Analyzer {
    fn analyze(&self, text: &str) -> std::result::Result<Vec<AnalyzedToken>, AnalyzerError>;
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, text: &str) -> std::result::Result<Vec<AnalyzedToken>, AnalyzerError> {
        (**self).analyze(text)
    }
}

/// Attach tokens to every text section of `book`, in reading order.
///
/// Sentinel tokens are skipped. A section's token list is replaced, not
/// extended, so calling this again after a failure is safe. Section
/// boundaries and image sections are never touched.
///
/// Returns the number of text sections annotated.
pub fn annotate<A: Analyzer + ?Sized>(book: &mut Book, analyzer: &A) -> Result<usize> {
    let mut ordinal = 0;

    for (chapter_index, chapter) in book.chapters.iter_mut().enumerate() {
        for (section_index, section) in chapter.sections.iter_mut().enumerate() {
            let Some(text_section) = section.as_text_mut() else {
                continue;
            };

            let analyzed =
                analyzer
                    .analyze(&text_section.text)
                    .map_err(|source| Error::Tokenization {
                        chapter: chapter_index,
                        section: section_index,
                        ordinal,
                        source,
                    })?;

            text_section.tokens = analyzed
                .into_iter()
                .filter(|t| !t.sentinel)
                .map(|t| Token::new(t.surface, t.features))
                .collect();
            ordinal += 1;
        }
        debug!(chapter = chapter_index, "chapter tokenized");
    }

    info!(sections = ordinal, "tokenization complete");
    Ok(ordinal)
}
