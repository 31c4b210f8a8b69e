//! Catalog pagination
//!
//! Pages are windows over a slice; nothing is copied beyond the items of
//! the requested page, and out-of-range offsets are not an error.

use serde::Serialize;

/// One window of a larger sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in `[offset, offset + limit)`, clipped to the sequence
    pub items: Vec<T>,
    /// Whether anything follows this page
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A page with no items and nothing after it
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            has_more: false,
        }
    }
}

/// The slice `[offset, offset + limit)` of `all`, clipped to its length
///
/// `has_more` is true iff `offset + limit < all.len()`. An offset past the
/// end yields an empty page.
///
/// # Example
///
/// ```
/// use docshelf_engine::paginator::page;
///
/// let all = [1, 2, 3, 4, 5];
/// let p = page(&all, 2, 2);
/// assert_eq!(p.items, vec![3, 4]);
/// assert!(p.has_more);
/// ```
pub fn page<T: Clone>(all: &[T], offset: usize, limit: usize) -> Page<T> {
    let end = offset.saturating_add(limit);
    if offset >= all.len() {
        return Page::empty();
    }
    let clipped = end.min(all.len());
    Page {
        items: all[offset..clipped].to_vec(),
        has_more: end < all.len(),
    }
}
