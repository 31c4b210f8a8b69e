//! Search visibility, blank queries and field weighting

use super::*;
use docshelf::DocumentId;
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{2,8}"
}

fn words(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(word(), 0..max)
}

#[derive(Debug, Clone)]
struct Entry {
    title: Vec<String>,
    content: Vec<String>,
    tags: Vec<String>,
}

fn entry() -> impl Strategy<Value = Entry> {
    (words(4), words(12), words(3)).prop_map(|(title, content, tags)| Entry {
        title,
        content,
        tags,
    })
}

#[test]
fn blank_queries_are_empty_for_any_corpus() {
    let (store, ingestor) = setup();
    for i in 0..20 {
        ingestor
            .ingest(text_request(&format!("doc {}", i), "lorem ipsum", "x"))
            .unwrap();
    }
    for q in ["", " ", "   ", "\t\n", "  ,.;  "] {
        assert!(store.search(q).unwrap().is_empty(), "query {:?}", q);
    }
}

#[test]
fn repeated_searches_agree() {
    let (store, ingestor) = setup();
    for i in 0..30 {
        ingestor
            .ingest(text_request("same title", &"common ".repeat(i % 4 + 1), ""))
            .unwrap();
    }
    let first: Vec<DocumentId> = store.search("common").unwrap().iter().map(|d| d.id()).collect();
    for _ in 0..5 {
        let again: Vec<DocumentId> =
            store.search("common").unwrap().iter().map(|d| d.id()).collect();
        assert_eq!(again, first);
    }
}

#[test]
fn equal_scores_prefer_newer_documents() {
    let (store, ingestor) = setup();
    let older = ingestor.ingest(text_request("tie", "", "")).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let newer = ingestor.ingest(text_request("tie", "", "")).unwrap();

    let hits = store.search("tie").unwrap();
    assert_eq!(hits[0].id(), newer.id());
    assert_eq!(hits[1].id(), older.id());
}

#[test]
fn more_matched_tokens_rank_higher() {
    let (store, ingestor) = setup();
    let one = ingestor.ingest(text_request("", "apple", "")).unwrap();
    let two = ingestor.ingest(text_request("", "apple banana", "")).unwrap();
    let ids: Vec<DocumentId> = store
        .search("apple banana")
        .unwrap()
        .iter()
        .map(|d| d.id())
        .collect();
    assert_eq!(ids, vec![two.id(), one.id()]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_indexed_token_finds_its_document(entries in proptest::collection::vec(entry(), 1..12)) {
        let (store, ingestor) = setup();
        for e in &entries {
            let doc = ingestor
                .ingest(text_request(&e.title.join(" "), &e.content.join(" "), &e.tags.join(",")))
                .unwrap();

            // Visible immediately after the write returns
            let tokens = e.title.iter().chain(&e.content).chain(&e.tags);
            for t in tokens {
                let hits = store.search(t).unwrap();
                prop_assert!(hits.iter().any(|h| h.id() == doc.id()), "token {} missing", t);
            }
        }
    }

    #[test]
    fn title_or_tag_match_outranks_content_match(
        token in "[a-z]{3,8}",
        filler in proptest::collection::vec("[0-9]{3,6}", 3),
        use_tags in any::<bool>(),
    ) {
        let (store, ingestor) = setup();
        let content_only = ingestor
            .ingest(text_request(&filler[0], &format!("{} {}", token, filler[1]), &filler[2]))
            .unwrap();
        let weighted = if use_tags {
            ingestor
                .ingest(text_request(&filler[0], &filler[1], &format!("{},{}", token, filler[2])))
                .unwrap()
        } else {
            ingestor
                .ingest(text_request(&format!("{} {}", token, filler[0]), &filler[1], &filler[2]))
                .unwrap()
        };

        let ids: Vec<DocumentId> = store.search(&token).unwrap().iter().map(|d| d.id()).collect();
        prop_assert_eq!(ids, vec![weighted.id(), content_only.id()]);
    }

    #[test]
    fn search_is_case_insensitive(token in "[a-z]{3,8}") {
        let (store, ingestor) = setup();
        let doc = ingestor.ingest(text_request("", &token.to_uppercase(), "")).unwrap();
        prop_assert_eq!(store.search(&token).unwrap()[0].id(), doc.id());
        prop_assert_eq!(store.search(&token.to_uppercase()).unwrap()[0].id(), doc.id());
    }
}
