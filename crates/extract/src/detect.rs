//! Format detection from filenames
//!
//! Pure function over the extension, case-insensitive. Every input yields
//! a tag; unknown or missing extensions yield `Unsupported`.

use docshelf_core::FormatTag;
use std::path::Path;

/// Classify a filename by its extension
///
/// # Example
///
/// ```
/// use docshelf_core::FormatTag;
/// use docshelf_extract::detect;
///
/// assert_eq!(detect("Q3 Report.PDF"), FormatTag::Pdf);
/// assert_eq!(detect("README"), FormatTag::Unsupported);
/// ```
pub fn detect(filename: &str) -> FormatTag {
    let ext = match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return FormatTag::Unsupported,
    };

    match ext.as_str() {
        "txt" | "text" => FormatTag::Text,
        "md" | "markdown" => FormatTag::Markdown,
        "pdf" => FormatTag::Pdf,
        "docx" => FormatTag::Word,
        _ => FormatTag::Unsupported,
    }
}
