//! Plain text and markdown extractor

use crate::error::ExtractError;
use crate::extractor::FormatExtractor;

/// Decodes bytes as UTF-8, verbatim
///
/// Markdown is kept as source; no rendering or markup stripping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl FormatExtractor for PlainTextExtractor {
    fn try_extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| ExtractError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            })
    }

    fn name(&self) -> &str {
        "plain-text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_roundtrip() {
        let text = "naïve café — ünïcödé";
        assert_eq!(PlainTextExtractor.try_extract(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_empty() {
        assert_eq!(PlainTextExtractor.try_extract(b"").unwrap(), "");
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let mut bytes = b"valid".to_vec();
        bytes.push(0xff);
        match PlainTextExtractor.try_extract(&bytes) {
            Err(ExtractError::InvalidUtf8 { valid_up_to }) => assert_eq!(valid_up_to, 5),
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }
}
