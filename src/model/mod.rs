//! Structured book model produced by the extraction pipeline.
//!
//! A [`Book`] is an ordered list of [`Chapter`]s, each an ordered list of
//! [`Section`]s. A section is either one sentence of narrative text (with
//! its morphological tokens) or one image reference.

mod book;
mod section;

pub use book::{Book, Chapter};
pub use section::{ImageSection, Section, TextSection, Token};
