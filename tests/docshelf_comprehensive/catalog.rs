//! Paging over the committed listing

use super::*;
use docshelf::{page, DocumentId};
use proptest::prelude::*;

fn fill(count: usize) -> Arc<DocumentStore> {
    let (store, ingestor) = setup();
    for i in 0..count {
        ingestor
            .ingest(text_request(&format!("doc {}", i), "", ""))
            .unwrap();
    }
    store
}

fn ids<T: AsRef<docshelf::Document>>(docs: &[T]) -> Vec<DocumentId> {
    docs.iter().map(|d| d.as_ref().id()).collect()
}

#[test]
fn default_page_size_is_six() {
    let store = fill(8);
    let size = store.config().catalog.page_size;
    assert_eq!(size, 6);

    let first = store.list_page(0, size).unwrap();
    assert_eq!(first.items.len(), 6);
    assert!(first.has_more);

    let second = store.list_page(6, size).unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_more);
}

#[test]
fn offset_past_end_is_empty() {
    let store = fill(3);
    let p = store.list_page(10, 6).unwrap();
    assert!(p.items.is_empty());
    assert!(!p.has_more);
}

#[test]
fn paging_is_idempotent() {
    let store = fill(10);
    let a = store.list_page(3, 4).unwrap();
    let b = store.list_page(3, 4).unwrap();
    assert_eq!(ids(&a.items), ids(&b.items));
    assert_eq!(a.has_more, b.has_more);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn successive_pages_reconstruct_the_listing(count in 0usize..40, k in 1usize..10) {
        let store = fill(count);
        let all = store.list_all().unwrap();

        let mut rebuilt = Vec::new();
        let mut offset = 0;
        loop {
            let p = page(&all, offset, k);
            rebuilt.extend(p.items);
            if !p.has_more {
                break;
            }
            offset += k;
        }
        prop_assert_eq!(ids(&rebuilt), ids(&all));

        // The store's own paging agrees with paging the listing
        let direct = store.list_page(0, k).unwrap();
        prop_assert_eq!(ids(&direct.items), ids(&page(&all, 0, k).items));
    }
}
