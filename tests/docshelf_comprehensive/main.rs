//! docshelf Comprehensive Test Suite
//!
//! End-to-end coverage across the crates: ingestion through extraction,
//! the store's commit path, search ranking and catalog pagination.
//!
//! ## Modules
//!
//! - `scenario`: the report walkthrough and tag round-trips
//! - `pipeline`: every supported format, well-formed and corrupted
//! - `search_properties`: visibility, blank queries and field weighting
//! - `catalog`: paging over the committed listing
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test docshelf_comprehensive
//! cargo test --test docshelf_comprehensive search_properties::
//! ```

use std::sync::Arc;

use docshelf::{DocumentStore, IngestRequest, Ingestor, Upload};

mod catalog;
mod pipeline;
mod scenario;
mod search_properties;

/// In-memory store plus an ingestor over it
fn setup() -> (Arc<DocumentStore>, Ingestor) {
    let store = DocumentStore::in_memory();
    let ingestor = Ingestor::new(Arc::clone(&store));
    (store, ingestor)
}

/// Request without a file
fn text_request(title: &str, content: &str, tags: &str) -> IngestRequest {
    IngestRequest {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        tags: Some(tags.to_string()),
        file: None,
    }
}

/// Request carrying only a file
fn file_request(name: &str, bytes: Vec<u8>) -> IngestRequest {
    IngestRequest {
        file: Some(Upload::new(name, bytes)),
        ..Default::default()
    }
}
