//! Saving and reloading indexes in every supported format.

use tempfile::TempDir;

use docsearch::config::LoadOptions;
use docsearch::error::DocsearchError;
use docsearch::format::{IndexFormat, load_path, read_index, save_path, write_index};
use docsearch::index::SearchIndex;

const FIXTURE: &str = include_str!("fixtures/searchindex.js");

fn fixture() -> SearchIndex {
    read_index(FIXTURE.as_bytes(), &LoadOptions::strict()).unwrap()
}

#[test]
fn test_round_trip_through_files() {
    let index = fixture();
    let dir = TempDir::new().unwrap();

    for (file, format) in [
        ("searchindex.js", IndexFormat::Script),
        ("searchindex.json", IndexFormat::Json),
        ("searchindex.bin", IndexFormat::Binary),
    ] {
        let path = dir.path().join(file);
        assert_eq!(save_path(&index, &path, None).unwrap(), format);

        let loaded = load_path(&path, &LoadOptions::strict()).unwrap();
        assert_eq!(loaded.document_count(), index.document_count());
        assert!(loaded.terms().map(|(term, _)| term).eq(index.terms().map(|(term, _)| term)));
        for (term, postings) in index.terms() {
            assert_eq!(loaded.term_postings(term), Some(postings), "{} in {}", term, format);
        }
        assert_eq!(loaded, index, "{} round trip", format);
    }
}

#[test]
fn test_explicit_format_overrides_extension() {
    let index = fixture();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("searchindex.js");

    assert_eq!(
        save_path(&index, &path, Some(IndexFormat::Binary)).unwrap(),
        IndexFormat::Binary
    );
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(IndexFormat::detect(&bytes), IndexFormat::Binary);
    assert_eq!(load_path(&path, &LoadOptions::default()).unwrap(), index);
}

#[test]
fn test_unknown_extension_defaults_to_script() {
    let index = fixture();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.data");

    assert_eq!(save_path(&index, &path, None).unwrap(), IndexFormat::Script);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Search.setIndex({"));
    assert!(text.ends_with(')'));
}

#[test]
fn test_corrupted_binary_is_rejected() {
    let index = fixture();
    let mut bytes = write_index(&index, IndexFormat::Binary).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0xff;

    let error = read_index(&bytes, &LoadOptions::default()).unwrap_err();
    assert!(matches!(error, DocsearchError::Corrupted(_)));
    assert!(error.is_rejected_index());

    bytes.truncate(middle);
    assert!(matches!(
        read_index(&bytes, &LoadOptions::default()),
        Err(DocsearchError::Corrupted(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let error = load_path(dir.path().join("missing.js"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(error, DocsearchError::Io(_)));
}
