//! Error types for docshelf
//!
//! This module defines the error taxonomy surfaced to callers.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Extraction faults are deliberately absent: they are absorbed inside the
//! extractor and never reach this type.

use crate::types::DocumentId;
use std::io;
use thiserror::Error;

/// Result type alias for docshelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docshelf
#[derive(Debug, Error)]
pub enum Error {
    /// Point lookup for an identifier that was never committed
    #[error("No such document: {id}")]
    NotFound {
        /// The identifier that was requested
        id: String,
    },

    /// The store or index failed to commit a write; nothing was committed
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// The committed index could not be read
    #[error("Query failure: {0}")]
    Query(String),

    /// Caller supplied input that violates a limit or invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// On-disk data failed validation
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// NotFound for a typed identifier
    pub fn not_found(id: DocumentId) -> Self {
        Error::NotFound { id: id.to_string() }
    }

    /// NotFound for a raw identifier string (e.g. one that failed to parse)
    pub fn not_found_raw(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Persistence failure with a message
    pub fn persistence(msg: impl Into<String>) -> Self {
        Error::Persistence(msg.into())
    }

    /// Query failure with a message
    pub fn query(msg: impl Into<String>) -> Self {
        Error::Query(msg.into())
    }

    /// Invalid input with a message
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Serialization failure with a message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Error::Serialization(msg.into())
    }

    /// Whether this is a `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether the caller is at fault (as opposed to the system)
    ///
    /// Client errors are reported verbatim; everything else is reported as
    /// a generic failure at the request boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::InvalidInput(_))
    }
}
