//! Ingestion: turning an upload request into a committed document
//!
//! For a request with a file the order is fixed:
//!
//! 1. detect the format from the file name;
//! 2. store the original bytes (synced before anything reads them);
//! 3. extract text under the configured bounds, unless the caller
//!    supplied content;
//! 4. commit the document.
//!
//! Extraction never fails the request: extracted text longer than the
//! store's content limit is cut to fit, as is a file name standing in for
//! the title. If the commit fails, the stored upload is removed again.

use crate::store::DocumentStore;
use docshelf_core::{Document, DocumentDraft, Result, TagSet};
use docshelf_extract::{detect, BoundedExtractor};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Title used when neither the caller nor a file supplies one
pub const UNTITLED: &str = "Untitled";

/// An uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// File name as sent by the client
    pub name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Upload with the given name and contents
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One ingest request; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestRequest {
    /// Display title
    pub title: Option<String>,
    /// Comma-separated tags
    pub tags: Option<String>,
    /// Text that takes precedence over anything extracted
    pub content: Option<String>,
    /// Attached original
    pub file: Option<Upload>,
}

/// Runs ingest requests against a store
///
/// Cheap to clone; requests on different threads proceed independently
/// until they reach the store's write path.
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: Arc<DocumentStore>,
    extractor: BoundedExtractor,
}

impl Ingestor {
    /// Ingestor using the store's extraction limits
    pub fn new(store: Arc<DocumentStore>) -> Self {
        let extractor = BoundedExtractor::new(store.config().extraction_limits());
        Ingestor { store, extractor }
    }

    /// The store documents are committed to
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Store the upload (if any), extract its text and commit the document
    ///
    /// # Errors
    ///
    /// Fails only if the upload cannot be stored or the document cannot be
    /// committed. A corrupt or unsupported file still produces a document.
    pub fn ingest(&self, request: IngestRequest) -> Result<Arc<Document>> {
        let IngestRequest {
            title,
            tags,
            content,
            file,
        } = request;

        let tags = tags.as_deref().map(TagSet::parse).unwrap_or_default();
        let user_content = content.filter(|c| !is_blank(c));

        let Some(upload) = file else {
            let draft = DocumentDraft::text_only(
                resolve_title(title, None),
                user_content.unwrap_or_default(),
                tags,
            );
            return self.store.write(draft);
        };

        let format = detect(&upload.name);
        let source_ref = self.store.blobs().put(&upload.name, &upload.bytes)?;
        debug!(
            source_ref = %source_ref,
            format = ?format,
            bytes = upload.bytes.len(),
            "Upload stored"
        );

        let limits = self.store.limits();
        let content = match user_content {
            Some(c) => c,
            None => {
                let bytes: Arc<[u8]> = Arc::from(upload.bytes.into_boxed_slice());
                let text = self.extractor.run(bytes, format);
                let extracted = text.len();
                let text = limits.clamp_content(text);
                if text.len() < extracted {
                    warn!(
                        source_ref = %source_ref,
                        extracted,
                        kept = text.len(),
                        "Extracted text exceeds content limit, truncating"
                    );
                }
                text
            }
        };

        let title = match title.filter(|t| !is_blank(t)) {
            Some(t) => t,
            None => limits.clamp_title(resolve_title(None, Some(&upload.name))),
        };

        let draft = DocumentDraft {
            title,
            content,
            tags,
            format,
            source_ref: Some(source_ref.clone()),
        };

        match self.store.write(draft) {
            Ok(doc) => {
                info!(
                    doc_id = %doc.id(),
                    format = ?doc.format(),
                    chars = doc.content().len(),
                    "Ingested upload"
                );
                Ok(doc)
            }
            Err(e) => {
                self.store.blobs().remove(&source_ref);
                Err(e)
            }
        }
    }
}

/// Non-blank caller title, else the file name, else `"Untitled"`
fn resolve_title(title: Option<String>, file_name: Option<&str>) -> String {
    match title.filter(|t| !is_blank(t)) {
        Some(t) => t,
        None => file_name
            .filter(|n| !is_blank(n))
            .unwrap_or(UNTITLED)
            .to_string(),
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshelf_core::{FormatTag, Limits};
    use docshelf_extract::fixtures;

    fn ingestor() -> Ingestor {
        Ingestor::new(DocumentStore::in_memory())
    }

    #[test]
    fn test_text_only_request() {
        let ingestor = ingestor();
        let doc = ingestor
            .ingest(IngestRequest {
                title: Some("Report".into()),
                content: Some("quarterly revenue increased".into()),
                tags: Some("finance,q3".into()),
                file: None,
            })
            .unwrap();

        assert_eq!(doc.title(), "Report");
        assert_eq!(doc.content(), "quarterly revenue increased");
        assert_eq!(doc.format(), FormatTag::None);
        assert!(doc.source_ref().is_none());
        assert_eq!(doc.tags().iter().collect::<Vec<_>>(), vec!["finance", "q3"]);
    }

    #[test]
    fn test_empty_request_is_untitled() {
        let doc = ingestor().ingest(IngestRequest::default()).unwrap();
        assert_eq!(doc.title(), UNTITLED);
        assert_eq!(doc.content(), "");
        assert!(doc.tags().is_empty());
    }

    #[test]
    fn test_blank_title_falls_back_to_file_name() {
        let doc = ingestor()
            .ingest(IngestRequest {
                title: Some("   ".into()),
                file: Some(Upload::new("notes.md", "# Notes")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(doc.title(), "notes.md");
        assert_eq!(doc.format(), FormatTag::Markdown);
        assert_eq!(doc.content(), "# Notes");
    }

    #[test]
    fn test_pdf_upload_is_extracted_and_stored() {
        let ingestor = ingestor();
        let pdf = fixtures::pdf_with_pages(&["annual budget", "second page"]);
        let doc = ingestor
            .ingest(IngestRequest {
                file: Some(Upload::new("budget.pdf", pdf.clone())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(doc.format(), FormatTag::Pdf);
        assert!(doc.content().contains("annual budget"));
        let source = doc.source_ref().unwrap();
        assert_eq!(ingestor.store().open_source(source).unwrap(), pdf);
        assert_eq!(ingestor.store().search("budget").unwrap()[0].id(), doc.id());
    }

    #[test]
    fn test_long_file_name_is_ingested() {
        let name = format!("{}.txt", "a".repeat(245));
        let ingestor = ingestor();
        let doc = ingestor
            .ingest(IngestRequest {
                file: Some(Upload::new(name.clone(), "long named")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(doc.title(), name);
        assert_eq!(doc.content(), "long named");
        let source = doc.source_ref().unwrap();
        assert_eq!(ingestor.store().open_source(source).unwrap(), b"long named");
    }

    #[test]
    fn test_oversized_extraction_is_truncated() {
        let limits = Limits::with_small_limits();
        let ingestor = Ingestor::new(DocumentStore::in_memory_with_limits(limits.clone()));
        let text = "word ".repeat(1000);
        let name = format!("{}.md", "n".repeat(100));

        let doc = ingestor
            .ingest(IngestRequest {
                file: Some(Upload::new(name.clone(), text.clone())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(doc.content().len(), limits.max_content_bytes);
        assert!(text.starts_with(doc.content()));
        assert_eq!(doc.title().len(), limits.max_title_bytes);
        assert!(name.starts_with(doc.title()));
        assert!(doc.source_ref().is_some());
    }

    #[test]
    fn test_oversized_caller_title_is_rejected() {
        let ingestor = Ingestor::new(DocumentStore::in_memory_with_limits(
            Limits::with_small_limits(),
        ));
        let err = ingestor
            .ingest(IngestRequest {
                title: Some("t".repeat(64)),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_user_content_wins_over_extraction() {
        let docx = fixtures::docx_with_paragraphs(&["from the file"]);
        let doc = ingestor()
            .ingest(IngestRequest {
                content: Some("typed by hand".into()),
                file: Some(Upload::new("memo.docx", docx)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(doc.content(), "typed by hand");
        assert_eq!(doc.format(), FormatTag::Word);
    }

    #[test]
    fn test_corrupt_upload_still_ingests() {
        let pdf = fixtures::truncate(&fixtures::pdf_with_pages(&["lost"]), 0.3);
        let doc = ingestor()
            .ingest(IngestRequest {
                title: Some("Broken".into()),
                file: Some(Upload::new("broken.pdf", pdf)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(doc.content(), "");
        assert_eq!(doc.format(), FormatTag::Pdf);
        assert!(doc.source_ref().is_some());
    }

    #[test]
    fn test_unsupported_upload_keeps_source() {
        let doc = ingestor()
            .ingest(IngestRequest {
                file: Some(Upload::new("legacy.doc", vec![0xD0, 0xCF, 0x11, 0xE0])),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(doc.format(), FormatTag::Unsupported);
        assert_eq!(doc.content(), "");
        assert!(doc.source_ref().is_some());
    }
}
