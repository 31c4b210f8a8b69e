//! Tokenizer shared by indexing and querying
//!
//! One rule for every field and for queries, so any token that appears
//! in a document is findable by searching for it.

use rustc_hash::FxHashSet;

/// Tokenize text into searchable terms
///
/// - Lowercase
/// - Split on non-alphanumeric characters
/// - Drop empty pieces (no minimum length otherwise)
///
/// # Example
///
/// ```
/// use docshelf_search::tokenizer::tokenize;
///
/// let tokens = tokenize("Q3 Report: revenue, up 5%!");
/// assert_eq!(tokens, vec!["q3", "report", "revenue", "up", "5"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate, keeping first-occurrence order
///
/// # Example
///
/// ```
/// use docshelf_search::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("test Test TEST other");
/// assert_eq!(tokens, vec!["test", "other"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
