//! Extraction fault type
//!
//! `ExtractError` never leaves this crate's public `extract` boundary; it
//! exists so each format extractor can use `?` internally and so the
//! boundary can log a precise reason before degrading to empty text.

use thiserror::Error;

/// Reasons a single extraction attempt failed
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Bytes were not valid UTF-8
    #[error("invalid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix
        valid_up_to: usize,
    },

    /// The PDF could not be parsed
    #[error("PDF parse error: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be read
    #[error("PDF is encrypted")]
    EncryptedPdf,

    /// The word-processing package could not be opened
    #[error("DOCX package error: {0}")]
    Package(String),

    /// A package part exceeded the decompression cap
    #[error("package part {part} exceeds {max} bytes")]
    PartTooLarge {
        /// Part name inside the package
        part: String,
        /// Cap in bytes
        max: u64,
    },

    /// Reading from the in-memory archive failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The extractor panicked
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

impl From<lopdf::Error> for ExtractError {
    fn from(e: lopdf::Error) -> Self {
        ExtractError::Pdf(e.to_string())
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(e: zip::result::ZipError) -> Self {
        ExtractError::Package(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ExtractError::InvalidUtf8 { valid_up_to: 7 };
        assert!(err.to_string().contains("byte 7"));

        let err = ExtractError::PartTooLarge {
            part: "word/document.xml".into(),
            max: 10,
        };
        assert!(err.to_string().contains("word/document.xml"));
    }
}
