//! PDF extractor
//!
//! Loads the document structure with lopdf and concatenates per-page text
//! in page order. Any page that fails to decode fails the whole document;
//! partial text is never returned.

use crate::error::ExtractError;
use crate::extractor::FormatExtractor;
use lopdf::Document;
use tracing::debug;

/// Extractor for PDF files
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn try_extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = Document::load_mem(bytes)?;
        if doc.is_encrypted() {
            return Err(ExtractError::EncryptedPdf);
        }

        // BTreeMap keyed by 1-based page number, so iteration is page order
        let pages = doc.get_pages();
        debug!(pages = pages.len(), "loaded PDF");

        let mut text = String::new();
        for page_number in pages.keys() {
            let page_text = doc.extract_text(&[*page_number])?;
            let page_text = page_text.trim_end();
            if page_text.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(page_text);
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "pdf"
    }
}
