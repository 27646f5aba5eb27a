//! Documents and document ordinals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title stored for pages that have none.
pub const NO_TITLE: &str = "<no title>";

/// Ordinal of a document within an index's document list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(pub u32);

impl DocumentRef {
    pub fn new(ordinal: u32) -> Self {
        DocumentRef(ordinal)
    }

    pub fn ordinal(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocumentRef {
    fn from(ordinal: u32) -> Self {
        DocumentRef(ordinal)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata stored for every indexed page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page name: relative path without extension, e.g. `_chapter1/c1_1`.
    pub docname: String,
    /// Source file the page was rendered from, e.g. `_chapter1/c1_1.md`.
    pub filename: String,
    /// Page title as displayed in results.
    pub title: String,
}

impl Document {
    pub fn new<D, F, T>(docname: D, filename: F, title: T) -> Self
    where
        D: Into<String>,
        F: Into<String>,
        T: Into<String>,
    {
        Document {
            docname: docname.into(),
            filename: filename.into(),
            title: title.into(),
        }
    }
}

/// A resolved document, borrowed from its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentInfo<'a> {
    pub ordinal: DocumentRef,
    pub docname: &'a str,
    pub filename: &'a str,
    pub title: &'a str,
}

impl<'a> DocumentInfo<'a> {
    pub(crate) fn new(ordinal: DocumentRef, document: &'a Document) -> Self {
        DocumentInfo {
            ordinal,
            docname: &document.docname,
            filename: &document.filename,
            title: &document.title,
        }
    }
}
