//! Building search indexes from documents.
//!
//! The builder runs every page through the same analyzer the query side
//! uses to normalize query words, so a word that was indexed can always be
//! found again.
//!
//! # Examples
//!
//! ```
//! use docsearch::builder::{IndexBuilder, SourceDocument};
//!
//! let mut builder = IndexBuilder::new().unwrap();
//! builder
//!     .feed(SourceDocument::new("intro", "intro.md", "Welcome", "Arrays are fun"))
//!     .unwrap();
//! let index = builder.freeze().unwrap();
//!
//! assert_eq!(index.document_count(), 1);
//! assert_eq!(index.lookup("arrai").len(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, EnglishAnalyzer};
use crate::config::{DEFAULT_ENV_VERSION, GENERATOR_ENV_TAG, LoadOptions};
use crate::error::{DocsearchError, Result};
use crate::index::{
    DocumentRef, IndexData, NO_TITLE, ObjectEntry, ObjectKind, ObjectTable, PostingSet,
    SearchIndex,
};

/// A page to be indexed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub docname: String,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    /// Plain text of the page body, excluding the title.
    #[serde(default)]
    pub body: String,
}

impl SourceDocument {
    pub fn new<D, F, T, B>(docname: D, filename: F, title: T, body: B) -> Self
    where
        D: Into<String>,
        F: Into<String>,
        T: Into<String>,
        B: Into<String>,
    {
        SourceDocument {
            docname: docname.into(),
            filename: filename.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Debug)]
struct PendingObject {
    prefix: String,
    name: String,
    objtype: u32,
    priority: i32,
    anchor: String,
}

#[derive(Clone, Debug)]
struct PendingDocument {
    filename: String,
    title: String,
    terms: BTreeSet<String>,
    title_terms: BTreeSet<String>,
    objects: Vec<PendingObject>,
}

/// Accumulates documents and produces a validated [`SearchIndex`].
///
/// Documents are keyed by docname; frozen indexes list them in docname
/// order.
pub struct IndexBuilder {
    analyzer: Arc<dyn Analyzer>,
    documents: BTreeMap<String, PendingDocument>,
    known_terms: BTreeSet<String>,
    known_title_terms: BTreeSet<String>,
    kinds: ObjectTable,
    env_version: BTreeMap<String, u32>,
}

impl IndexBuilder {
    /// Create a builder with the English analyzer.
    pub fn new() -> Result<Self> {
        Ok(Self::with_analyzer(Arc::new(EnglishAnalyzer::new()?)))
    }

    /// Create a builder with a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        IndexBuilder {
            analyzer,
            documents: BTreeMap::new(),
            known_terms: BTreeSet::new(),
            known_title_terms: BTreeSet::new(),
            kinds: ObjectTable::new(),
            env_version: BTreeMap::from([(GENERATOR_ENV_TAG.to_string(), DEFAULT_ENV_VERSION)]),
        }
    }

    /// Reopen a frozen index so documents can be added, replaced or pruned.
    ///
    /// The index's analyzer is not stored, so the English analyzer is used
    /// for new documents.
    pub fn from_index(index: &SearchIndex) -> Result<Self> {
        let mut builder = Self::new()?;
        builder.env_version = index.env_version().clone();

        let mut documents: Vec<(String, PendingDocument)> = index
            .documents()
            .map(|info| {
                (
                    info.docname.to_string(),
                    PendingDocument {
                        filename: info.filename.to_string(),
                        title: info.title.to_string(),
                        terms: BTreeSet::new(),
                        title_terms: BTreeSet::new(),
                        objects: Vec::new(),
                    },
                )
            })
            .collect();

        for (term, postings) in index.terms() {
            builder.known_terms.insert(term.to_string());
            for doc in postings {
                documents[doc.index()].1.terms.insert(term.to_string());
            }
        }
        for (term, postings) in index.title_terms() {
            builder.known_title_terms.insert(term.to_string());
            for doc in postings {
                documents[doc.index()].1.title_terms.insert(term.to_string());
            }
        }
        for object in index.objects().iter() {
            let objtype = builder.kinds.intern_kind(object.kind.clone());
            documents[object.entry.document.index()]
                .1
                .objects
                .push(PendingObject {
                    prefix: object.prefix.to_string(),
                    name: object.name.to_string(),
                    objtype,
                    priority: object.entry.priority,
                    anchor: object.entry.anchor.clone(),
                });
        }

        for (docname, pending) in documents {
            if builder.documents.insert(docname.clone(), pending).is_some() {
                return Err(DocsearchError::invalid_argument(format!(
                    "docname `{}` appears more than once",
                    docname
                )));
            }
        }
        Ok(builder)
    }

    /// Set an entry of the environment version table.
    pub fn set_env_version<S: Into<String>>(&mut self, name: S, version: u32) -> &mut Self {
        self.env_version.insert(name.into(), version);
        self
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Add a document, replacing the terms and metadata of any document
    /// already fed under the same docname.
    pub fn feed(&mut self, document: SourceDocument) -> Result<()> {
        let analyzed = analyze(self.analyzer.as_ref(), document)?;
        self.insert(analyzed);
        Ok(())
    }

    /// Add many documents, analyzing them in parallel.
    ///
    /// The result is the same as feeding them one by one in order.
    pub fn feed_all(&mut self, documents: Vec<SourceDocument>) -> Result<()> {
        let started = Instant::now();
        let count = documents.len();
        let analyzer = self.analyzer.as_ref();
        let analyzed = documents
            .into_par_iter()
            .map(|document| analyze(analyzer, document))
            .collect::<Result<Vec<_>>>()?;

        for document in analyzed {
            self.insert(document);
        }
        debug!("Analyzed {} documents in {:?}", count, started.elapsed());
        Ok(())
    }

    fn insert(&mut self, (docname, mut document): (String, PendingDocument)) {
        self.known_terms.extend(document.terms.iter().cloned());
        self.known_title_terms
            .extend(document.title_terms.iter().cloned());
        if let Some(previous) = self.documents.remove(&docname) {
            debug!("Replacing document `{}`", docname);
            document.objects = previous.objects;
        }
        self.documents.insert(docname, document);
    }

    /// Register a domain object defined in `docname`.
    pub fn add_object<P, N, A>(
        &mut self,
        docname: &str,
        prefix: P,
        name: N,
        kind: ObjectKind,
        priority: i32,
        anchor: A,
    ) -> Result<()>
    where
        P: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        let objtype = self.kinds.intern_kind(kind);
        let document = self.documents.get_mut(docname).ok_or_else(|| {
            DocsearchError::invalid_argument(format!("document `{}` has not been fed", docname))
        })?;
        document.objects.push(PendingObject {
            prefix: prefix.into(),
            name: name.into(),
            objtype,
            priority,
            anchor: anchor.into(),
        });
        Ok(())
    }

    /// Drop every document whose docname is not in `keep`.
    ///
    /// Terms that only occurred in dropped documents stay in the index with
    /// an empty posting set.
    pub fn prune<S: AsRef<str>>(&mut self, keep: &[S]) -> usize {
        let keep: BTreeSet<&str> = keep.iter().map(|docname| docname.as_ref()).collect();
        let before = self.documents.len();
        self.documents
            .retain(|docname, _| keep.contains(docname.as_str()));
        let removed = before - self.documents.len();
        debug!("Pruned {} documents", removed);
        removed
    }

    /// Assign ordinals in docname order and build the validated index.
    pub fn freeze(&self) -> Result<SearchIndex> {
        let started = Instant::now();
        let mut terms: BTreeMap<String, Vec<DocumentRef>> = self
            .known_terms
            .iter()
            .map(|term| (term.clone(), Vec::new()))
            .collect();
        let mut title_terms: BTreeMap<String, Vec<DocumentRef>> = self
            .known_title_terms
            .iter()
            .map(|term| (term.clone(), Vec::new()))
            .collect();

        let mut objects = self.kinds.clone();
        let mut data = IndexData {
            envversion: self.env_version.clone(),
            ..IndexData::default()
        };

        for (ordinal, (docname, document)) in self.documents.iter().enumerate() {
            let doc = DocumentRef(ordinal as u32);
            data.docnames.push(docname.clone());
            data.filenames.push(document.filename.clone());
            data.titles.push(document.title.clone());

            for term in &document.terms {
                terms.entry(term.clone()).or_default().push(doc);
            }
            for term in &document.title_terms {
                title_terms.entry(term.clone()).or_default().push(doc);
            }
            for object in &document.objects {
                objects.insert(
                    object.prefix.clone(),
                    object.name.clone(),
                    ObjectEntry::new(doc, object.objtype, object.priority, object.anchor.clone()),
                )?;
            }
        }

        data.terms = into_postings(terms);
        data.titleterms = into_postings(title_terms);
        let (objects, objtypes, objnames) = objects.to_wire();
        data.objects = objects;
        data.objtypes = objtypes;
        data.objnames = objnames;

        let index = SearchIndex::from_data(data, &LoadOptions::default())?;
        debug!(
            "Froze index of {} documents in {:?}",
            index.document_count(),
            started.elapsed()
        );
        Ok(index)
    }
}

fn into_postings(table: BTreeMap<String, Vec<DocumentRef>>) -> BTreeMap<String, PostingSet> {
    table
        .into_iter()
        .map(|(term, docs)| (term, docs.into_iter().collect()))
        .collect()
}

fn analyze(
    analyzer: &dyn Analyzer,
    document: SourceDocument,
) -> Result<(String, PendingDocument)> {
    let SourceDocument {
        docname,
        filename,
        title,
        body,
    } = document;

    if docname.is_empty() {
        return Err(DocsearchError::invalid_argument("docname must not be empty"));
    }
    if filename.is_empty() {
        return Err(DocsearchError::invalid_argument(format!(
            "document `{}` has no filename",
            docname
        )));
    }

    let terms = analyzer.analyze(&body)?.map(|token| token.text).collect();
    let title_terms = analyzer.analyze(&title)?.map(|token| token.text).collect();
    let title = if title.trim().is_empty() {
        NO_TITLE.to_string()
    } else {
        title
    };

    Ok((
        docname,
        PendingDocument {
            filename,
            title,
            terms,
            title_terms,
            objects: Vec::new(),
        },
    ))
}
