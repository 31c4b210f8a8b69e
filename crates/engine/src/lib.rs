//! Document engine for docshelf
//!
//! This crate ties the lower layers together:
//! - DocumentStore: atomic persist + index, point lookup, ordered listing
//! - Ingestor: upload request → stored original → extracted text → document
//! - paginator: catalog windows over the ordered listing
//! - DocshelfConfig: `docshelf.toml` in the data directory
//!
//! The engine is the only component that knows about:
//! - Where the log, uploads and config live
//! - Recovery (replaying the log into the snapshot and index)
//! - Write serialization

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ingest;
pub mod paginator;
pub mod store;

pub use ingest::{IngestRequest, Ingestor, Upload, UNTITLED};
pub use paginator::{page, Page};
pub use store::{
    CatalogConfig, DocshelfConfig, DocumentStore, ExtractionConfig, StoreStats, CONFIG_FILE_NAME,
    LOCK_FILE_NAME,
};
