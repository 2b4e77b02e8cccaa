//! # yomiage
//!
//! Turns Japanese EPUB books into a reading model of chapters and
//! sentence-level sections, ready for read-aloud and morphological analysis.
//!
//! ## Features
//!
//! - Reads EPUB 2/3 archives in spine order
//! - Drops furigana (`<rt>`) and keeps ruby base text
//! - Splits paragraphs into sentences without breaking quoted dialogue
//! - Collects referenced images by file name and picks a cover
//! - Annotates sentences with tokens from any [`Analyzer`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use yomiage::{ExtractOptions, ScriptAnalyzer, annotate, read_book};
//!
//! let mut book = read_book("book.epub", &ExtractOptions::default())?;
//! annotate(&mut book, &ScriptAnalyzer::new())?;
//!
//! for section in book.text_sections() {
//!     println!("{}", section.text);
//! }
//! # Ok::<(), yomiage::Error>(())
//! ```
//!
//! ## Building a Book by Hand
//!
//! [`BookBuilder`] takes parsed documents directly, which is handy when the
//! markup does not come from an EPUB:
//!
//! ```
//! use yomiage::BookBuilder;
//! use yomiage::dom::parse_html;
//!
//! let mut builder = BookBuilder::new("短編");
//! builder.add_document(&parse_html("<p><ruby>漢<rt>かん</rt></ruby>字。</p>"), true);
//! let book = builder.finish()?;
//!
//! assert_eq!(book.text_sections().next().unwrap().text, "漢字。");
//! # Ok::<(), yomiage::Error>(())
//! ```

pub mod assemble;
mod convert;
pub mod dom;
pub mod epub;
mod error;
pub mod extract;
pub mod images;
pub mod model;
pub mod segment;
pub mod tokenize;
pub(crate) mod util;

pub use assemble::BookBuilder;
pub use convert::{convert_epub, read_book};
pub use epub::EpubReader;
pub use error::{Error, Result};
pub use extract::ExtractOptions;
pub use model::{Book, Chapter, ImageSection, Section, TextSection, Token};
pub use segment::SentenceRules;
pub use tokenize::{Analyzer, ScriptAnalyzer, annotate};
