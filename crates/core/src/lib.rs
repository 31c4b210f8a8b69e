//! Core types for docshelf
//!
//! This crate defines the foundational types shared by every layer:
//! - DocumentId: Unique, immutable document identifier
//! - FormatTag: Classification of an uploaded file
//! - TagSet: Duplicate-free set of user tags
//! - SourceRef: Reference to a stored original upload
//! - Document / DocumentDraft: The unit of storage and search
//! - Error: Error taxonomy (NotFound, Persistence, Query, ...)
//! - Limits: Input size limits enforced at ingestion

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod format;
pub mod limits;
pub mod types;

pub use document::{Document, DocumentDraft};
pub use error::{Error, Result};
pub use format::FormatTag;
pub use limits::{LimitError, Limits};
pub use types::{DocumentId, SourceRef, TagSet};
