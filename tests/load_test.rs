//! Integration tests for loading a generated `searchindex.js`.

use docsearch::analysis::analyzer::{Analyzer, EnglishAnalyzer};
use docsearch::config::LoadOptions;
use docsearch::error::DocsearchError;
use docsearch::format::{IndexFormat, read_index};
use docsearch::index::{DocumentRef, NO_TITLE, PostingSet, SearchIndex};

const FIXTURE: &str = include_str!("fixtures/searchindex.js");

fn load() -> SearchIndex {
    read_index(FIXTURE.as_bytes(), &LoadOptions::strict()).unwrap()
}

#[test]
fn test_fixture_loads() {
    assert_eq!(IndexFormat::detect(FIXTURE.as_bytes()), IndexFormat::Script);

    let index = load();
    let stats = index.statistics();
    assert_eq!(stats.document_count, 7);
    assert_eq!(stats.term_count, 296);
    assert_eq!(stats.title_term_count, 32);
    assert_eq!(stats.empty_postings, 8);
    assert_eq!(stats.total_postings, 408);
    assert_eq!(stats.object_count, 0);

    assert_eq!(index.env_version().get("sphinx"), Some(&56));
    assert_eq!(index.env_version().get("sphinx.domains.cpp"), Some(&5));
}

#[test]
fn test_every_document_resolves() {
    let index = load();
    for ordinal in 0..index.document_count() as u32 {
        let info = index.resolve(DocumentRef(ordinal)).unwrap();
        assert_eq!(info.ordinal, DocumentRef(ordinal));
        assert!(!info.filename.is_empty());
        assert!(!info.title.is_empty());
    }

    let info = index.resolve(DocumentRef(5)).unwrap();
    assert_eq!(info.docname, "old/notebooks");
    assert_eq!(info.filename, "old/notebooks.ipynb");
    assert_eq!(info.title, "Content with notebooks");

    assert!(matches!(
        index.resolve(DocumentRef(7)),
        Err(DocsearchError::OutOfRange { ordinal: 7, count: 7 })
    ));
}

#[test]
fn test_every_posting_resolves() {
    let index = load();
    for (term, postings) in index.terms().chain(index.title_terms()) {
        if postings.is_empty() {
            continue;
        }
        assert!(!index.lookup(term).is_empty() || !index.lookup_title(term).is_empty());
        for doc in postings {
            assert!(index.resolve(doc).is_ok(), "`{}` refers to {}", term, doc);
        }
    }
}

#[test]
fn test_lookup() {
    let index = load();
    assert_eq!(index.lookup("hello"), &PostingSet::from_ordinals([0, 1, 6]));
    assert_eq!(index.lookup("The"), &PostingSet::from_ordinals([3, 4]));
    assert_eq!(index.lookup("notebooks"), &PostingSet::from_ordinals([3]));
    assert_eq!(index.lookup("uses"), &PostingSet::from_ordinals([2, 3, 4]));
    assert!(index.lookup("markdown").is_empty());
    assert!(index.lookup("nonexistent").is_empty());

    assert_eq!(index.lookup_title("Markdown"), &PostingSet::from_ordinals([3, 4, 5]));
    assert_eq!(index.lookup_prefix("note"), PostingSet::from_ordinals([3]));
    assert_eq!(index.lookup_title_prefix("c"), PostingSet::from_ordinals([0, 1, 3, 4, 5]));
}

#[test]
fn test_titles_analyze_to_indexed_title_terms() {
    let index = load();
    let analyzer = EnglishAnalyzer::new().unwrap();

    for info in index.documents() {
        for token in analyzer.analyze(info.title).unwrap() {
            let postings = index
                .title_term_postings(&token.text)
                .unwrap_or_else(|| panic!("title term `{}` is missing", token.text));
            assert!(
                postings.contains(info.ordinal),
                "`{}` does not list {}",
                token.text,
                info.ordinal
            );
        }
    }
}

#[test]
fn test_loading_is_idempotent() {
    let first = load();
    let second = load();
    assert_eq!(first, second);

    for (term, postings) in first.terms() {
        assert_eq!(second.lookup(term), postings);
    }
    for info in first.documents() {
        assert_eq!(second.resolve(info.ordinal).unwrap(), info);
    }
}

#[test]
fn test_rejects_out_of_range_ordinal() {
    let broken = FIXTURE.replace("world:[0,1,6]", "world:[0,1,7]");
    assert_ne!(broken, FIXTURE);

    let error = read_index(broken.as_bytes(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        error,
        DocsearchError::OutOfRange { ordinal: 7, count: 7 }
    ));
    assert!(error.is_rejected_index());
}

#[test]
fn test_rejects_malformed_script() {
    let truncated = &FIXTURE[..FIXTURE.len() / 2];
    assert!(matches!(
        read_index(truncated.as_bytes(), &LoadOptions::default()),
        Err(DocsearchError::Parse { .. })
    ));

    let unbalanced = FIXTURE.replacen("docnames:[", "docnames:[[", 1);
    assert!(read_index(unbalanced.as_bytes(), &LoadOptions::default()).is_err());
}

#[test]
fn test_rejects_missing_fields() {
    let renamed = FIXTURE.replacen("titles:[", "headings:[", 1);
    assert!(matches!(
        read_index(renamed.as_bytes(), &LoadOptions::default()),
        Err(DocsearchError::Schema(_))
    ));

    let short = FIXTURE.replacen("\"old/test.md\"", "", 1).replacen(",]", "]", 1);
    assert!(matches!(
        read_index(short.as_bytes(), &LoadOptions::default()),
        Err(DocsearchError::Schema(_))
    ));
}

#[test]
fn test_version_mismatch() {
    let options = LoadOptions::default().with_expected_env_version(57);
    assert!(matches!(
        read_index(FIXTURE.as_bytes(), &options),
        Err(DocsearchError::IncompatibleVersion(_))
    ));

    assert!(read_index(FIXTURE.as_bytes(), &LoadOptions::default()).is_ok());
}

#[test]
fn test_empty_title_gets_placeholder() {
    let script = r#"Search.setIndex({docnames:["a","b"],filenames:["a.md","b.md"],titles:["","B"],terms:{x:0},titleterms:{b:1}})"#;
    let index = read_index(script.as_bytes(), &LoadOptions::default()).unwrap();

    assert_eq!(index.resolve(DocumentRef(0)).unwrap().title, NO_TITLE);
    assert_eq!(index.resolve(DocumentRef(1)).unwrap().title, "B");
    assert_eq!(index.lookup("x"), &PostingSet::from_ordinals([0]));
}
