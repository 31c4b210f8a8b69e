//! Format detection and text extraction
//!
//! This crate provides:
//! - `detect`: filename → `FormatTag`
//! - `Extractor`: closed set of per-format extractors selected by tag
//! - `extract`: the non-fatal boundary (faults become empty text)
//! - `BoundedExtractor`: runs extraction on a worker thread with a
//!   size cap and a deadline
//! - `fixtures`: builders for well-formed and corrupted test inputs
//!
//! # Usage
//!
//! ```
//! use docshelf_extract::{detect, extract};
//!
//! let tag = detect("notes.md");
//! let text = extract(b"# Notes\nhello", tag);
//! assert_eq!(text, "# Notes\nhello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detect;
pub mod error;
pub mod extractor;
pub mod fixtures;
pub mod pdf;
pub mod runner;
pub mod text;
pub mod word;

pub use detect::detect;
pub use error::ExtractError;
pub use extractor::{extract, Extractor, FormatExtractor};
pub use runner::{BoundedExtractor, ExtractionLimits};
