//! The report walkthrough and tag round-trips

use super::*;
use docshelf::{DocumentId, FormatTag, TagSet};
use tempfile::TempDir;

#[test]
fn report_walkthrough() {
    let (store, ingestor) = setup();

    let doc = ingestor
        .ingest(text_request("Report", "quarterly revenue increased", "finance,q3"))
        .unwrap();

    assert_eq!(doc.format(), FormatTag::None);
    assert!(doc.source_ref().is_none());
    assert_eq!(doc.content(), "quarterly revenue increased");

    let hits = store.search("revenue").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), doc.id());

    assert!(store.search("").unwrap().is_empty());
    assert!(store.get_by_id(DocumentId::new()).unwrap_err().is_not_found());
}

#[test]
fn duplicate_tags_collapse() {
    let (store, ingestor) = setup();
    let doc = ingestor.ingest(text_request("t", "", "a,b,a,c")).unwrap();

    let fetched = store.get_by_id(doc.id()).unwrap();
    assert_eq!(fetched.tags(), &TagSet::parse("c,b,a"));
    assert_eq!(fetched.tags().len(), 3);
}

#[test]
fn duplicate_tags_collapse_across_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let store = DocumentStore::open(dir.path()).unwrap();
        Ingestor::new(store)
            .ingest(text_request("t", "", " a , b,a,,c "))
            .unwrap()
            .id()
    };

    let store = DocumentStore::open(dir.path()).unwrap();
    let tags: Vec<String> = store
        .get_by_id(id)
        .unwrap()
        .tags()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn tags_are_searchable() {
    let (store, ingestor) = setup();
    let doc = ingestor.ingest(text_request("Report", "", "finance,q3")).unwrap();
    assert_eq!(store.search("Q3").unwrap()[0].id(), doc.id());
    assert_eq!(store.search("finance").unwrap()[0].id(), doc.id());
}

#[test]
fn documents_are_immutable_once_read() {
    let (store, ingestor) = setup();
    let doc = ingestor.ingest(text_request("one", "body", "")).unwrap();
    ingestor.ingest(text_request("two", "body", "")).unwrap();
    assert_eq!(*store.get_by_id(doc.id()).unwrap(), *doc);
}
