//! Query evaluation
//!
//! `SearchEngine::search` reads a committed index and its document list,
//! scores every document sharing a token with the query, and returns them
//! ordered by score (desc), then `createdAt` (desc), then `id` (asc).

use crate::index::InvertedIndex;
use crate::scorer::{FieldWeightedScorer, Scorer, ScorerContext};
use crate::tokenizer::tokenize_unique;
use docshelf_core::{Document, Error, Result};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// One ranked result
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matching document
    pub document: Arc<Document>,
    /// Relevance score (always > 0)
    pub score: f64,
}

/// Ranks committed documents against free-text queries
pub struct SearchEngine {
    scorer: Box<dyn Scorer>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(Box::new(FieldWeightedScorer::default()))
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl SearchEngine {
    /// Engine with a custom scorer
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        SearchEngine { scorer }
    }

    /// Rank `docs` against `query`
    ///
    /// `docs[i]` must be the document indexed under ordinal `i`. A blank
    /// query yields no hits. Fails with `Query` if the index refers to a
    /// document that is not in `docs`.
    pub fn search(
        &self,
        index: &InvertedIndex,
        docs: &[Arc<Document>],
        query: &str,
    ) -> Result<Vec<SearchHit>> {
        let terms = tokenize_unique(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let ctx = ScorerContext::new(index.total_docs());
        let mut scores: FxHashMap<usize, f64> = FxHashMap::default();

        for term in &terms {
            let Some(postings) = index.postings(term) else {
                continue;
            };
            let idf = ctx.idf(postings.len());
            for entry in &postings.entries {
                let s = self.scorer.score_term(&entry.freqs, idf);
                *scores.entry(entry.doc).or_insert(0.0) += s;
            }
        }

        let mut hits = Vec::with_capacity(scores.len());
        for (ordinal, score) in scores {
            if score <= 0.0 {
                continue;
            }
            let document = docs.get(ordinal).ok_or_else(|| {
                Error::query(format!(
                    "index refers to document #{} but only {} are committed",
                    ordinal,
                    docs.len()
                ))
            })?;
            hits.push(SearchHit {
                document: Arc::clone(document),
                score,
            });
        }

        hits.sort_by(rank_order);

        debug!(
            scorer = self.scorer.name(),
            terms = terms.len(),
            hits = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}

/// Score desc, then createdAt desc, then id asc
fn rank_order(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.document.created_at().cmp(&a.document.created_at()))
        .then_with(|| a.document.id().cmp(&b.document.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DocTerms;
    use chrono::{Duration, TimeZone, Utc};
    use docshelf_core::{DocumentDraft, DocumentId, TagSet};

    struct Corpus {
        index: InvertedIndex,
        docs: Vec<Arc<Document>>,
    }

    impl Corpus {
        fn new() -> Self {
            Corpus {
                index: InvertedIndex::new(),
                docs: Vec::new(),
            }
        }

        fn add_at(&mut self, minute: i64, title: &str, content: &str, tags: &str) -> DocumentId {
            let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minute);
            let doc = Document::from_draft(
                DocumentId::new(),
                created,
                DocumentDraft::text_only(title, content, TagSet::parse(tags)),
            );
            let id = doc.id();
            self.index.insert(self.docs.len(), DocTerms::from_document(&doc));
            self.docs.push(Arc::new(doc));
            id
        }

        fn search(&self, q: &str) -> Vec<DocumentId> {
            SearchEngine::default()
                .search(&self.index, &self.docs, q)
                .unwrap()
                .iter()
                .map(|h| h.document.id())
                .collect()
        }
    }

    #[test]
    fn test_blank_query_is_empty() {
        let mut corpus = Corpus::new();
        corpus.add_at(0, "anything", "at all", "");
        assert!(corpus.search("").is_empty());
        assert!(corpus.search("   ").is_empty());
        assert!(corpus.search(" ,.; ").is_empty());
    }

    #[test]
    fn test_non_matching_excluded() {
        let mut corpus = Corpus::new();
        let hit = corpus.add_at(0, "revenue", "", "");
        corpus.add_at(1, "costs", "", "");
        assert_eq!(corpus.search("revenue"), vec![hit]);
    }

    #[test]
    fn test_title_beats_content() {
        let mut corpus = Corpus::new();
        // content-only doc is newer, so only the score can put title first
        let title = corpus.add_at(0, "budget", "", "");
        let content = corpus.add_at(5, "", "budget", "");
        assert_eq!(corpus.search("budget"), vec![title, content]);
    }

    #[test]
    fn test_tags_equal_title() {
        let mut corpus = Corpus::new();
        let tagged = corpus.add_at(0, "", "", "budget");
        let titled = corpus.add_at(0, "budget", "", "");
        let hits = SearchEngine::default()
            .search(&corpus.index, &corpus.docs, "budget")
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].score, hits[1].score);
        let mut expected = vec![tagged, titled];
        expected.sort();
        assert_eq!(corpus.search("budget"), expected);
    }

    #[test]
    fn test_more_distinct_terms_rank_higher() {
        let mut corpus = Corpus::new();
        let one = corpus.add_at(5, "", "alpha", "");
        let two = corpus.add_at(0, "", "alpha beta", "");
        assert_eq!(corpus.search("alpha beta"), vec![two, one]);
    }

    #[test]
    fn test_repeated_query_terms_count_once() {
        let mut corpus = Corpus::new();
        corpus.add_at(0, "", "alpha", "");
        let engine = SearchEngine::default();
        let once = engine.search(&corpus.index, &corpus.docs, "alpha").unwrap();
        let thrice = engine
            .search(&corpus.index, &corpus.docs, "alpha ALPHA alpha")
            .unwrap();
        assert_eq!(once[0].score, thrice[0].score);
    }

    #[test]
    fn test_ties_newest_first() {
        let mut corpus = Corpus::new();
        let old = corpus.add_at(0, "same", "", "");
        let new = corpus.add_at(10, "same", "", "");
        assert_eq!(corpus.search("same"), vec![new, old]);
    }

    #[test]
    fn test_missing_document_is_query_fault() {
        let mut corpus = Corpus::new();
        corpus.add_at(0, "orphan", "", "");
        let err = SearchEngine::default()
            .search(&corpus.index, &[], "orphan")
            .unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }
}
