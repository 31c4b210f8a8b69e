//! Field-aware inverted index
//!
//! Maps each term to the documents containing it, with per-field term
//! frequencies (title, tags, content). Documents are referred to by their
//! ordinal in the store's insertion-ordered list.
//!
//! The index itself is not synchronized. The document store owns it and
//! mutates it only under its write lock, together with the document list.

use crate::tokenizer::tokenize;
use docshelf_core::Document;
use rustc_hash::FxHashMap;

// ============================================================================
// FieldFreqs
// ============================================================================

/// Occurrences of one term in each indexed field of one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFreqs {
    /// Occurrences in the title
    pub title: u32,
    /// Occurrences across all tags
    pub tags: u32,
    /// Occurrences in the content
    pub content: u32,
}

impl FieldFreqs {
    /// Occurrences across all fields
    pub fn total(&self) -> u32 {
        self.title + self.tags + self.content
    }
}

/// Indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Document title
    Title,
    /// Document tags
    Tags,
    /// Document content
    Content,
}

// ============================================================================
// DocTerms
// ============================================================================

/// Tokenized form of one document, ready to insert
///
/// Built outside any lock; tokenizing large content is the expensive part
/// of indexing.
#[derive(Debug, Clone, Default)]
pub struct DocTerms {
    terms: FxHashMap<String, FieldFreqs>,
}

impl DocTerms {
    /// Tokenize a document's title, tags, and content
    pub fn from_document(doc: &Document) -> Self {
        let mut terms = DocTerms::default();
        terms.add(Field::Title, doc.title());
        for tag in doc.tags().iter() {
            terms.add(Field::Tags, tag);
        }
        terms.add(Field::Content, doc.content());
        terms
    }

    /// Count every token of `text` toward `field`
    pub fn add(&mut self, field: Field, text: &str) {
        for token in tokenize(text) {
            let freqs = self.terms.entry(token).or_default();
            match field {
                Field::Title => freqs.title += 1,
                Field::Tags => freqs.tags += 1,
                Field::Content => freqs.content += 1,
            }
        }
    }

    /// Frequencies for `term`, if present
    pub fn get(&self, term: &str) -> Option<FieldFreqs> {
        self.terms.get(term).copied()
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the document has no tokens at all
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ============================================================================
// PostingEntry / PostingList
// ============================================================================

/// Entry in a posting list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingEntry {
    /// Ordinal of the document in insertion order
    pub doc: usize,
    /// Term frequencies in that document
    pub freqs: FieldFreqs,
}

/// Documents containing a term, in insertion order
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Document entries
    pub entries: Vec<PostingEntry>,
}

impl PostingList {
    /// Number of documents containing this term
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Term → postings map over every committed document
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: FxHashMap<String, PostingList>,
    total_docs: usize,
}

impl InvertedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document's terms under ordinal `doc`
    ///
    /// Ordinals must be inserted in increasing order, one per document,
    /// so posting lists stay sorted by insertion.
    pub fn insert(&mut self, doc: usize, terms: DocTerms) {
        for (term, freqs) in terms.terms {
            self.postings
                .entry(term)
                .or_default()
                .entries
                .push(PostingEntry { doc, freqs });
        }
        self.total_docs += 1;
    }

    /// Postings for `term`
    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Number of documents containing `term`
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, PostingList::len)
    }

    /// Documents indexed
    pub fn total_docs(&self) -> usize {
        self.total_docs
    }

    /// Distinct terms indexed
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}
