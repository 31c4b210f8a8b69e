//! Full-text search for docshelf
//!
//! This crate provides:
//! - `tokenize`: the single tokenization rule for fields and queries
//! - `InvertedIndex`: term → postings with per-field frequencies
//! - `Scorer` / `FieldWeightedScorer`: pluggable per-term scoring
//! - `SearchEngine`: deterministic ranking over a committed index
//!
//! # Usage
//!
//! ```
//! use docshelf_core::{Document, DocumentDraft, DocumentId, TagSet};
//! use docshelf_search::{DocTerms, InvertedIndex, SearchEngine};
//! use std::sync::Arc;
//!
//! let doc = Document::from_draft(
//!     DocumentId::new(),
//!     chrono::Utc::now(),
//!     DocumentDraft::text_only("Report", "quarterly revenue increased", TagSet::parse("finance")),
//! );
//! let mut index = InvertedIndex::new();
//! index.insert(0, DocTerms::from_document(&doc));
//! let docs = vec![Arc::new(doc)];
//!
//! let hits = SearchEngine::default().search(&index, &docs, "Revenue").unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod index;
pub mod scorer;
pub mod tokenizer;

pub use engine::{SearchEngine, SearchHit};
pub use index::{DocTerms, Field, FieldFreqs, InvertedIndex, PostingEntry, PostingList};
pub use scorer::{FieldWeightedScorer, FieldWeights, Scorer, ScorerContext};
pub use tokenizer::{tokenize, tokenize_unique};
