//! Format classification for uploaded files
//!
//! A `FormatTag` is the closed set of formats the extractor understands,
//! plus `Unsupported` for attached files it does not, plus `None` for
//! documents that carry no file at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a document's original upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    /// Plain UTF-8 text (`.txt`, `.text`)
    Text,
    /// Markdown source (`.md`, `.markdown`)
    Markdown,
    /// Portable Document Format (`.pdf`)
    Pdf,
    /// Office Open XML word-processing package (`.docx`)
    Word,
    /// A file was attached but its format is not recognised
    Unsupported,
    /// No file was attached
    None,
}

impl FormatTag {
    /// All tags, in declaration order
    pub const ALL: [FormatTag; 6] = [
        FormatTag::Text,
        FormatTag::Markdown,
        FormatTag::Pdf,
        FormatTag::Word,
        FormatTag::Unsupported,
        FormatTag::None,
    ];

    /// Stable lowercase name, as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Text => "text",
            FormatTag::Markdown => "markdown",
            FormatTag::Pdf => "pdf",
            FormatTag::Word => "word",
            FormatTag::Unsupported => "unsupported",
            FormatTag::None => "none",
        }
    }

    /// Whether the extractor produces text for this format
    pub fn is_extractable(&self) -> bool {
        matches!(
            self,
            FormatTag::Text | FormatTag::Markdown | FormatTag::Pdf | FormatTag::Word
        )
    }

    /// Whether this tag describes an attached file
    ///
    /// Every tag except `None` implies a stored original.
    pub fn has_source(&self) -> bool {
        !matches!(self, FormatTag::None)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
