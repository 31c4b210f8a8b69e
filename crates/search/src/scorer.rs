//! Scoring
//!
//! For query tokens `Q` (distinct) and a document `d`:
//!
//! ```text
//! score(d) = Σ_{t ∈ Q, t ∈ d} idf(t) · (w_title·tf_title + w_tags·tf_tags + w_content·tf_content)
//! idf(t)   = ln((N − df(t) + 0.5) / (df(t) + 0.5) + 1)
//! ```
//!
//! `idf` is strictly positive for any `N ≥ df`, so every extra matched
//! token and every extra occurrence raises the score.

use crate::index::FieldFreqs;

// ============================================================================
// ScorerContext
// ============================================================================

/// Corpus-level statistics for one query
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorerContext {
    /// Total committed documents
    pub total_docs: usize,
}

impl ScorerContext {
    /// Create a context for a corpus of `total_docs` documents
    pub fn new(total_docs: usize) -> Self {
        ScorerContext { total_docs }
    }

    /// Smoothed inverse document frequency
    ///
    /// IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
    pub fn idf(&self, doc_freq: usize) -> f64 {
        let n = self.total_docs as f64;
        let df = doc_freq as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

// ============================================================================
// Scorer Trait
// ============================================================================

/// Pluggable per-term scoring
///
/// A document's score is the sum of `score_term` over the distinct query
/// tokens it contains. Implementations must be monotonic in every field
/// frequency and return 0 only when all frequencies are 0.
pub trait Scorer: Send + Sync {
    /// Contribution of one matched term
    fn score_term(&self, freqs: &FieldFreqs, idf: f64) -> f64;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// FieldWeightedScorer
// ============================================================================

/// Per-field multipliers applied to term frequencies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    /// Title weight
    pub title: f64,
    /// Tags weight
    pub tags: f64,
    /// Content weight
    pub content: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 2.0,
            tags: 2.0,
            content: 1.0,
        }
    }
}

/// TF-IDF with field weights; title and tags count double
#[derive(Debug, Clone, Default)]
pub struct FieldWeightedScorer {
    weights: FieldWeights,
}

impl FieldWeightedScorer {
    /// Scorer with custom weights
    ///
    /// Title and tag weights below the content weight would let a content
    /// match outrank an equal title match; callers own that choice.
    pub fn new(weights: FieldWeights) -> Self {
        FieldWeightedScorer { weights }
    }

    /// Weights in effect
    pub fn weights(&self) -> FieldWeights {
        self.weights
    }
}

impl Scorer for FieldWeightedScorer {
    fn score_term(&self, freqs: &FieldFreqs, idf: f64) -> f64 {
        let w = &self.weights;
        let weighted = w.title * freqs.title as f64
            + w.tags * freqs.tags as f64
            + w.content * freqs.content as f64;
        idf * weighted
    }

    fn name(&self) -> &str {
        "field-weighted-tfidf"
    }
}
