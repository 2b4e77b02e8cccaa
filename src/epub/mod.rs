//! EPUB container and package document reading.

mod reader;

pub use reader::{EpubMetadata, EpubReader, ManifestEntry, SpineEntry};
