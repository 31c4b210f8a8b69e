//! Every supported format through the ingest pipeline

use super::*;
use docshelf::FormatTag;
use docshelf_extract::fixtures;

#[test]
fn well_formed_text() {
    let (store, ingestor) = setup();
    let doc = ingestor
        .ingest(file_request("minutes.txt", b"board approved the merger".to_vec()))
        .unwrap();
    assert_eq!(doc.format(), FormatTag::Text);
    assert_eq!(doc.title(), "minutes.txt");
    assert_eq!(doc.content(), "board approved the merger");
    assert_eq!(store.search("merger").unwrap()[0].id(), doc.id());
}

#[test]
fn well_formed_markdown() {
    let (store, ingestor) = setup();
    let doc = ingestor
        .ingest(file_request("README.md", b"# Setup\n\ninstall the toolchain".to_vec()))
        .unwrap();
    assert_eq!(doc.format(), FormatTag::Markdown);
    assert_eq!(doc.content(), "# Setup\n\ninstall the toolchain");
    assert_eq!(store.search("toolchain").unwrap()[0].id(), doc.id());
}

#[test]
fn well_formed_pdf() {
    let (store, ingestor) = setup();
    let pdf = fixtures::pdf_with_pages(&["invoice total due", "payment terms net thirty"]);
    let doc = ingestor.ingest(file_request("invoice.pdf", pdf)).unwrap();

    assert_eq!(doc.format(), FormatTag::Pdf);
    let first = doc.content().find("invoice total due").unwrap();
    let second = doc.content().find("payment terms net thirty").unwrap();
    assert!(first < second, "pages must stay in order");
    assert_eq!(store.search("thirty").unwrap()[0].id(), doc.id());
}

#[test]
fn well_formed_word() {
    let (store, ingestor) = setup();
    let docx = fixtures::docx_with_paragraphs(&["Dear team,", "the offsite is moved to Friday."]);
    let doc = ingestor.ingest(file_request("memo.docx", docx)).unwrap();

    assert_eq!(doc.format(), FormatTag::Word);
    assert_eq!(doc.content(), "Dear team,\nthe offsite is moved to Friday.");
    assert_eq!(store.search("offsite").unwrap()[0].id(), doc.id());
}

#[test]
fn corrupted_pdf_yields_empty_content() {
    let (store, ingestor) = setup();
    let pdf = fixtures::pdf_with_pages(&["secret words"]);
    let doc = ingestor
        .ingest(IngestRequest {
            title: Some("Scan".into()),
            ..file_request("scan.pdf", fixtures::truncate(&pdf, 0.3))
        })
        .unwrap();

    assert_eq!(doc.format(), FormatTag::Pdf);
    assert_eq!(doc.content(), "");
    assert!(store.search("secret").unwrap().is_empty());
    assert_eq!(store.search("scan").unwrap()[0].id(), doc.id());
}

#[test]
fn corrupted_word_yields_empty_content() {
    let (_, ingestor) = setup();
    let docx = fixtures::docx_with_paragraphs(&["hidden"]);
    let len = docx.len();
    let broken = fixtures::stomp(&docx, len - 22..len);
    let doc = ingestor.ingest(file_request("broken.docx", broken)).unwrap();
    assert_eq!(doc.format(), FormatTag::Word);
    assert_eq!(doc.content(), "");
}

#[test]
fn invalid_utf8_text_yields_empty_content() {
    let (_, ingestor) = setup();
    let doc = ingestor
        .ingest(file_request("latin1.txt", vec![b'c', b'a', b'f', 0xE9]))
        .unwrap();
    assert_eq!(doc.format(), FormatTag::Text);
    assert_eq!(doc.content(), "");
}

#[test]
fn unsupported_file_is_kept_without_text() {
    let (store, ingestor) = setup();
    let doc = ingestor
        .ingest(file_request("photo.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .unwrap();
    assert_eq!(doc.format(), FormatTag::Unsupported);
    assert_eq!(doc.content(), "");
    let source = doc.source_ref().unwrap();
    assert_eq!(store.open_source(source).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[test]
fn user_content_overrides_extraction() {
    let (_, ingestor) = setup();
    let pdf = fixtures::pdf_with_pages(&["extracted words"]);
    let doc = ingestor
        .ingest(IngestRequest {
            content: Some("typed summary".into()),
            ..file_request("report.pdf", pdf)
        })
        .unwrap();
    assert_eq!(doc.content(), "typed summary");
}

#[test]
fn blank_user_content_falls_back_to_extraction() {
    let (_, ingestor) = setup();
    let doc = ingestor
        .ingest(IngestRequest {
            content: Some("   ".into()),
            ..file_request("notes.txt", b"from the file".to_vec())
        })
        .unwrap();
    assert_eq!(doc.content(), "from the file");
}
