//! Per-format extractor dispatch
//!
//! The set of extractors is closed: `Extractor::for_format` maps every
//! `FormatTag` to exactly one variant. Each variant may fail internally;
//! `Extractor::extract` is the single boundary where a fault (or a panic
//! inside a parser) is logged and replaced by empty text.

use crate::error::ExtractError;
use crate::pdf::PdfExtractor;
use crate::text::PlainTextExtractor;
use crate::word::WordExtractor;
use docshelf_core::FormatTag;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// A format-specific text extractor
///
/// Implementations may fail; callers outside this crate go through
/// `Extractor::extract`, which never does.
pub trait FormatExtractor: Send + Sync {
    /// Convert raw bytes into plain text
    fn try_extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Closed set of extraction strategies, one per format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// UTF-8 text and markdown
    PlainText,
    /// PDF page streams
    Pdf,
    /// DOCX paragraphs
    Word,
    /// Unsupported or absent files: empty text, no work
    Noop,
}

impl Extractor {
    /// Select the extractor for a format tag
    pub fn for_format(tag: FormatTag) -> Self {
        match tag {
            FormatTag::Text | FormatTag::Markdown => Extractor::PlainText,
            FormatTag::Pdf => Extractor::Pdf,
            FormatTag::Word => Extractor::Word,
            FormatTag::Unsupported | FormatTag::None => Extractor::Noop,
        }
    }

    /// Run the extractor, propagating faults
    ///
    /// Panics inside a parser are converted into `ExtractError::Panicked`.
    pub fn try_extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let strategy: &dyn FormatExtractor = match self {
            Extractor::PlainText => &PlainTextExtractor,
            Extractor::Pdf => &PdfExtractor,
            Extractor::Word => &WordExtractor,
            Extractor::Noop => return Ok(String::new()),
        };

        panic::catch_unwind(AssertUnwindSafe(|| strategy.try_extract(bytes)))
            .unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(&payload))))
    }

    /// Run the extractor; any fault yields empty text
    pub fn extract(&self, bytes: &[u8]) -> String {
        match self.try_extract(bytes) {
            Ok(text) => {
                debug!(extractor = ?self, bytes = bytes.len(), chars = text.len(), "extracted text");
                text
            }
            Err(e) => {
                warn!(extractor = ?self, bytes = bytes.len(), error = %e, "extraction failed, using empty text");
                String::new()
            }
        }
    }
}

/// Extract text from `bytes` according to `tag`, never failing
///
/// Parse errors, corruption, and parser panics are logged and resolve to
/// an empty string.
pub fn extract(bytes: &[u8], tag: FormatTag) -> String {
    Extractor::for_format(tag).extract(bytes)
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
