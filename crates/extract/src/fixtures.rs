//! Builders for well-formed and corrupted extraction inputs
//!
//! Fixtures are authored in code instead of checked in as binaries, so
//! tests in every crate can produce a real PDF or DOCX with known text.
//!
//! # Example
//!
//! ```
//! use docshelf_core::FormatTag;
//! use docshelf_extract::{extract, fixtures};
//!
//! let docx = fixtures::docx_with_paragraphs(&["hello"]);
//! assert_eq!(extract(&docx, FormatTag::Word), "hello");
//! assert_eq!(extract(&fixtures::truncate(&docx, 0.5), FormatTag::Word), "");
//! ```

use lopdf::content::{Content, Operation};
use docx_rs::{Docx, Paragraph, Run};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A PDF with one page per entry, each page showing that text
///
/// # Panics
///
/// Panics if lopdf fails to serialize the document (test helper).
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let encoded = content.encode().expect("encode page content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::from(page_id));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize PDF");
    buf
}

/// A DOCX package with one paragraph per entry
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    pack_docx(docx)
}

/// Serialize a `docx-rs` document into package bytes
///
/// # Panics
///
/// Panics if the package cannot be written (test helper).
pub fn pack_docx(docx: Docx) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).expect("pack DOCX");
    cursor.into_inner()
}

/// A zip archive with the given (name, contents) entries
///
/// # Panics
///
/// Panics if the in-memory writer fails (test helper).
pub fn zip_with_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Keep only the leading `fraction` of `bytes`
pub fn truncate(bytes: &[u8], fraction: f64) -> Vec<u8> {
    let keep = ((bytes.len() as f64) * fraction.clamp(0.0, 1.0)) as usize;
    bytes[..keep].to_vec()
}

/// Overwrite every byte in `range` with `0xFF`
pub fn stomp(bytes: &[u8], range: std::ops::Range<usize>) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let end = range.end.min(out.len());
    let start = range.start.min(end);
    for b in &mut out[start..end] {
        *b = 0xFF;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_has_header_and_trailer() {
        let bytes = pdf_with_pages(&["x"]);
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn test_docx_is_zip() {
        let bytes = docx_with_paragraphs(&["x"]);
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_truncate_and_stomp() {
        let bytes = vec![1u8; 10];
        assert_eq!(truncate(&bytes, 0.5).len(), 5);
        assert_eq!(truncate(&bytes, 2.0).len(), 10);
        let stomped = stomp(&bytes, 2..4);
        assert_eq!(&stomped[..5], &[1, 1, 0xFF, 0xFF, 1]);
        assert_eq!(stomp(&bytes, 8..100).len(), 10);
    }
}
