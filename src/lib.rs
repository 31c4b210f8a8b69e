//! docshelf - document store with text extraction and ranked search
//!
//! docshelf ingests documents (typed text or uploaded `.txt`, `.md`,
//! `.pdf` and `.docx` files), extracts their text without ever failing the
//! request, persists them in an append-only log, and serves ranked
//! full-text search and an ordered, pageable catalog.
//!
//! # Quick Start
//!
//! ```
//! use docshelf::{DocumentStore, IngestRequest, Ingestor};
//!
//! let store = DocumentStore::in_memory();
//! let ingestor = Ingestor::new(store.clone());
//!
//! let doc = ingestor.ingest(IngestRequest {
//!     title: Some("Report".into()),
//!     content: Some("quarterly revenue increased".into()),
//!     tags: Some("finance,q3".into()),
//!     file: None,
//! })?;
//!
//! assert_eq!(store.search("revenue")?[0].id(), doc.id());
//! assert!(store.search("   ")?.is_empty());
//! # Ok::<(), docshelf::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `docshelf-core`: document model and error taxonomy
//! - `docshelf-extract`: format detection and non-fatal extraction
//! - `docshelf-storage`: commit log, recovery and upload storage
//! - `docshelf-search`: tokenizer, inverted index and ranking
//! - `docshelf-engine`: the store, ingestion and pagination

pub use docshelf_core::{
    Document, DocumentDraft, DocumentId, Error, FormatTag, Limits, Result, SourceRef, TagSet,
};
pub use docshelf_engine::{
    page, DocshelfConfig, DocumentStore, IngestRequest, Ingestor, Page, StoreStats, Upload,
};
pub use docshelf_extract::{detect, extract};
pub use docshelf_search::SearchHit;
pub use docshelf_storage::DurabilityMode;
