//! Query scenarios against a generated `searchindex.js`.

use std::sync::Arc;

use docsearch::config::{LoadOptions, SearchConfig};
use docsearch::format::read_index;
use docsearch::index::DocumentRef;
use docsearch::search::{HitKind, SearchHit, Searcher};

const FIXTURE: &str = include_str!("fixtures/searchindex.js");

fn searcher() -> Searcher {
    let index = read_index(FIXTURE.as_bytes(), &LoadOptions::default()).unwrap();
    Searcher::new(Arc::new(index)).unwrap()
}

fn titles(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.title.as_str()).collect()
}

fn ordinals(hits: &[SearchHit]) -> Vec<u32> {
    hits.iter().map(|hit| hit.document.ordinal()).collect()
}

#[test]
fn test_body_terms() {
    let hits = searcher().search("hello world").unwrap();
    assert_eq!(titles(&hits), vec!["C1_1?", "C2_1?", "Test?"]);
    assert!(hits.iter().all(|hit| hit.score == 5));
    assert!(hits.iter().all(|hit| hit.kind == HitKind::Document));
    assert_eq!(hits[0].link(), "_chapter1/c1_1");
}

#[test]
fn test_title_terms_outrank_body_terms() {
    let searcher = searcher();

    let hits = searcher.search("markdown").unwrap();
    assert_eq!(
        titles(&hits),
        vec![
            "Content with notebooks",
            "Markdown Files",
            "Notebooks with MyST Markdown"
        ]
    );
    assert!(hits.iter().all(|hit| hit.score == 15));

    let hits = searcher.search("notebooks").unwrap();
    assert_eq!(ordinals(&hits), vec![5, 4, 3]);
    assert_eq!(
        hits.iter().map(|hit| hit.score).collect::<Vec<_>>(),
        vec![15, 15, 5]
    );
}

#[test]
fn test_stemmed_query_words() {
    let hits = searcher().search("use").unwrap();
    assert_eq!(ordinals(&hits), vec![3, 4, 2]);
    assert_eq!(hits[2].docname, "intro");
}

#[test]
fn test_excluded_terms() {
    let searcher = searcher();
    assert!(searcher.search("hello -test").unwrap().is_empty());

    let hits = searcher.search("hello -c2_1").unwrap();
    assert_eq!(titles(&hits), vec!["C1_1?", "Test?"]);
}

#[test]
fn test_every_required_term_must_match() {
    let searcher = searcher();
    assert!(searcher.search("hello nonexistentword").unwrap().is_empty());

    let hits = searcher.search("markdown notebooks").unwrap();
    assert_eq!(ordinals(&hits), vec![5, 3, 4]);
    assert!(hits.iter().all(|hit| hit.score == 15));
}

#[test]
fn test_partial_matches() {
    let hits = searcher().search("neuro").unwrap();
    assert_eq!(ordinals(&hits), vec![2, 3]);
    assert_eq!(
        hits.iter().map(|hit| hit.score).collect::<Vec<_>>(),
        vec![7, 2]
    );
}

#[test]
fn test_queries_without_searchable_words() {
    let searcher = searcher();
    assert!(searcher.search("").unwrap().is_empty());
    assert!(searcher.search("the and of").unwrap().is_empty());
    assert!(searcher.search("?! ...").unwrap().is_empty());
}

#[test]
fn test_max_results() {
    let index = read_index(FIXTURE.as_bytes(), &LoadOptions::default()).unwrap();
    let searcher =
        Searcher::with_config(Arc::new(index), SearchConfig::default().with_max_results(2))
            .unwrap();

    let hits = searcher.search("hello").unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document, DocumentRef(0));
}
