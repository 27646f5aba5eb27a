//! Building indexes from source documents.

use std::sync::Arc;

use docsearch::builder::{IndexBuilder, SourceDocument};
use docsearch::config::LoadOptions;
use docsearch::format::{IndexFormat, read_index, write_index};
use docsearch::index::{ObjectKind, PostingSet};
use docsearch::search::{HitKind, Searcher};

fn chapters() -> IndexBuilder {
    let mut builder = IndexBuilder::new().unwrap();
    builder
        .feed_all(vec![
            SourceDocument::new("_chapter1/c1_1", "_chapter1/c1_1.md", "C1_1?", "hello world"),
            SourceDocument::new("_chapter2/c2_1", "_chapter2/c2_1.md", "C2_1?", "hello world"),
        ])
        .unwrap();
    builder
}

#[test]
fn test_build_and_lookup() {
    let index = chapters().freeze().unwrap();

    assert_eq!(index.document_count(), 2);
    assert_eq!(index.lookup("hello"), &PostingSet::from_ordinals([0, 1]));
    assert_eq!(index.lookup("world"), &PostingSet::from_ordinals([0, 1]));
    assert!(index.lookup("nonexistent").is_empty());
    assert_eq!(index.lookup_title("c1_1"), &PostingSet::from_ordinals([0]));
    let doc = index.find_document("_chapter2/c2_1").unwrap();
    assert_eq!(index.resolve(doc).unwrap().title, "C2_1?");
}

#[test]
fn test_built_index_survives_the_script_format() {
    let index = chapters().freeze().unwrap();
    let bytes = write_index(&index, IndexFormat::Script).unwrap();
    assert!(bytes.starts_with(b"Search.setIndex("));

    let loaded = read_index(&bytes, &LoadOptions::strict()).unwrap();
    assert_eq!(loaded, index);
}

#[test]
fn test_refeed_replaces_document() {
    let mut builder = chapters();
    builder
        .feed(SourceDocument::new(
            "_chapter1/c1_1",
            "_chapter1/c1_1.md",
            "C1_1?",
            "goodbye",
        ))
        .unwrap();
    let index = builder.freeze().unwrap();

    assert_eq!(index.document_count(), 2);
    assert_eq!(index.lookup("hello"), &PostingSet::from_ordinals([1]));
    assert_eq!(index.lookup("goodbye"), &PostingSet::from_ordinals([0]));
}

#[test]
fn test_prune_keeps_vocabulary() {
    let mut builder = chapters();
    assert_eq!(builder.prune(&["_chapter2/c2_1"]), 1);
    let index = builder.freeze().unwrap();

    assert_eq!(index.document_count(), 1);
    assert_eq!(index.lookup("hello"), &PostingSet::from_ordinals([0]));
    assert_eq!(index.title_term_postings("c1_1"), Some(&PostingSet::new()));
}

#[test]
fn test_objects_are_searchable() {
    let mut builder = chapters();
    builder
        .add_object(
            "_chapter1/c1_1",
            "greetings",
            "say_hello",
            ObjectKind::new("py", "function", "Python function"),
            1,
            "",
        )
        .unwrap();
    assert!(
        builder
            .add_object(
                "missing",
                "greetings",
                "say_goodbye",
                ObjectKind::new("py", "function", "Python function"),
                1,
                "",
            )
            .is_err()
    );

    let index = builder.freeze().unwrap();
    assert_eq!(index.objects().len(), 1);

    let searcher = Searcher::new(Arc::new(index)).unwrap();
    let hits = searcher.search("say_hello").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].kind, HitKind::Object);
    assert_eq!(hits[0].title, "greetings.say_hello");
    assert_eq!(hits[0].score, 11 + 5);
    assert_eq!(hits[0].link(), "_chapter1/c1_1#greetings.say_hello");
    assert_eq!(
        hits[0].description.as_deref(),
        Some("Python function, in C1_1?")
    );
}

#[test]
fn test_reopen_rejects_repeated_docnames() {
    let script = r#"Search.setIndex({docnames:["a","a"],filenames:["a.md","a2.md"],titles:["A","A"],terms:{x:0,y:1},titleterms:{}})"#;
    let index = read_index(script.as_bytes(), &LoadOptions::default()).unwrap();
    assert_eq!(index.document_count(), 2);

    let Err(error) = IndexBuilder::from_index(&index) else {
        panic!("repeated docnames were merged");
    };
    assert!(error.to_string().contains("`a` appears more than once"));
    assert!(!error.is_rejected_index());
}
