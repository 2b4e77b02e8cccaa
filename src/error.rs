//! Error types for yomiage operations.

use thiserror::Error;

use crate::tokenize::AnalyzerError;

/// Errors that can occur while reading an EPUB or building a [`Book`](crate::Book).
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "cli")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("Missing document in archive: {0}")]
    MissingDocument(String),

    /// Extraction finished without producing a single section.
    #[error("book contains no readable sections")]
    EmptyBook,

    /// The analyzer failed on one text section. Chapters built so far are kept,
    /// so tokenization can be retried on the same book.
    #[error("tokenization failed at chapter {chapter}, section {section} (text section #{ordinal}): {source}")]
    Tokenization {
        chapter: usize,
        section: usize,
        ordinal: usize,
        #[source]
        source: AnalyzerError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
