//! The validated, read-only index table.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::LazyLock;

use log::{debug, warn};
use serde::Serialize;

use crate::analysis::analyzer::english::IndexTermFilter;
use crate::config::{GENERATOR_ENV_TAG, LoadOptions};
use crate::error::{DocsearchError, Result};
use crate::index::data::IndexData;
use crate::index::document::{Document, DocumentInfo, DocumentRef, NO_TITLE};
use crate::index::object::{ObjectKind, ObjectTable};
use crate::index::posting::PostingSet;

static EMPTY: PostingSet = PostingSet::new();

static TERM_FILTER: LazyLock<IndexTermFilter> = LazyLock::new(IndexTermFilter::new);

/// Summary counts of an index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexStatistics {
    pub document_count: usize,
    pub term_count: usize,
    pub title_term_count: usize,
    /// Terms and title terms whose posting set is empty.
    pub empty_postings: usize,
    pub object_count: usize,
    /// Sum of all posting set sizes, terms and title terms together.
    pub total_postings: usize,
}

/// An immutable documentation search index.
///
/// A `SearchIndex` can only be obtained through [`SearchIndex::from_data`]
/// (directly, through a codec in [`crate::format`], or through
/// [`IndexBuilder::freeze`](crate::builder::IndexBuilder::freeze)), so every
/// posting in it refers to an existing document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchIndex {
    documents: Vec<Document>,
    terms: BTreeMap<String, PostingSet>,
    title_terms: BTreeMap<String, PostingSet>,
    env_version: BTreeMap<String, u32>,
    objects: ObjectTable,
}

impl SearchIndex {
    /// Validate wire tables and build an index from them.
    ///
    /// The whole index is rejected on the first violation.
    pub fn from_data(data: IndexData, options: &LoadOptions) -> Result<Self> {
        let IndexData {
            docnames,
            envversion,
            filenames,
            objects,
            objnames,
            objtypes,
            terms,
            titles,
            titleterms,
        } = data;

        if docnames.len() != filenames.len() || docnames.len() != titles.len() {
            return Err(DocsearchError::schema(format!(
                "docnames, filenames and titles differ in length ({}, {}, {})",
                docnames.len(),
                filenames.len(),
                titles.len()
            )));
        }

        check_env_version(&envversion, options)?;

        let count = docnames.len();
        let mut seen = HashSet::with_capacity(count);
        let mut documents = Vec::with_capacity(count);
        for (ordinal, ((docname, filename), title)) in
            docnames.into_iter().zip(filenames).zip(titles).enumerate()
        {
            if docname.is_empty() {
                return Err(DocsearchError::schema(format!(
                    "document {} has an empty docname",
                    ordinal
                )));
            }
            if filename.is_empty() {
                return Err(DocsearchError::schema(format!(
                    "document `{}` has an empty filename",
                    docname
                )));
            }
            let title = if title.trim().is_empty() {
                warn!("Document `{}` has an empty title", docname);
                NO_TITLE.to_string()
            } else {
                title
            };
            if !seen.insert(docname.clone()) {
                warn!("Docname `{}` appears more than once", docname);
            }
            documents.push(Document::new(docname, filename, title));
        }

        let empty_terms = check_postings("terms", &terms, count)?;
        let empty_title_terms = check_postings("titleterms", &titleterms, count)?;
        if empty_terms + empty_title_terms > 0 {
            warn!(
                "Index holds {} empty term postings and {} empty title-term postings",
                empty_terms, empty_title_terms
            );
        }

        let objects = ObjectTable::from_wire(objects, objtypes, objnames, count)?;

        debug!(
            "Loaded index with {} documents, {} terms, {} title terms, {} objects",
            count,
            terms.len(),
            titleterms.len(),
            objects.len()
        );

        Ok(SearchIndex {
            documents,
            terms,
            title_terms: titleterms,
            env_version: envversion,
            objects,
        })
    }

    /// Wire form of this index.
    pub fn to_data(&self) -> IndexData {
        let (objects, objtypes, objnames) = self.objects.to_wire();
        IndexData {
            docnames: self.documents.iter().map(|d| d.docname.clone()).collect(),
            envversion: self.env_version.clone(),
            filenames: self.documents.iter().map(|d| d.filename.clone()).collect(),
            objects,
            objnames,
            objtypes,
            terms: self.terms.clone(),
            titles: self.documents.iter().map(|d| d.title.clone()).collect(),
            titleterms: self.title_terms.clone(),
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Metadata of the document with the given ordinal.
    pub fn resolve(&self, doc: DocumentRef) -> Result<DocumentInfo<'_>> {
        self.documents
            .get(doc.index())
            .map(|document| DocumentInfo::new(doc, document))
            .ok_or_else(|| DocsearchError::out_of_range(doc.ordinal(), self.documents.len()))
    }

    /// Every document, in ordinal order.
    pub fn documents(&self) -> impl Iterator<Item = DocumentInfo<'_>> + '_ {
        self.documents
            .iter()
            .enumerate()
            .map(|(ordinal, document)| DocumentInfo::new(DocumentRef(ordinal as u32), document))
    }

    /// Ordinal of the first document named `docname`.
    pub fn find_document(&self, docname: &str) -> Option<DocumentRef> {
        self.documents
            .iter()
            .position(|document| document.docname == docname)
            .map(|ordinal| DocumentRef(ordinal as u32))
    }

    /// Documents containing `term`.
    ///
    /// The term is tried verbatim first, then as the index term the builder
    /// would have produced for it. Unknown terms give an empty set.
    pub fn lookup(&self, term: &str) -> &PostingSet {
        lookup_in(&self.terms, term)
    }

    /// Documents whose title contains `term`. Same fallbacks as
    /// [`lookup`](Self::lookup).
    pub fn lookup_title(&self, term: &str) -> &PostingSet {
        lookup_in(&self.title_terms, term)
    }

    /// Documents containing any term that starts with `prefix`.
    pub fn lookup_prefix(&self, prefix: &str) -> PostingSet {
        prefix_union(&self.terms, prefix)
    }

    /// Documents whose title contains any term that starts with `prefix`.
    pub fn lookup_title_prefix(&self, prefix: &str) -> PostingSet {
        prefix_union(&self.title_terms, prefix)
    }

    /// Postings stored under exactly `term`, if the term is present.
    pub fn term_postings(&self, term: &str) -> Option<&PostingSet> {
        self.terms.get(term)
    }

    /// Postings stored under exactly the title term `term`, if present.
    pub fn title_term_postings(&self, term: &str) -> Option<&PostingSet> {
        self.title_terms.get(term)
    }

    /// All terms with their postings, in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &PostingSet)> + '_ {
        self.terms.iter().map(|(term, postings)| (term.as_str(), postings))
    }

    /// All title terms with their postings, in lexicographic order.
    pub fn title_terms(&self) -> impl Iterator<Item = (&str, &PostingSet)> + '_ {
        self.title_terms
            .iter()
            .map(|(term, postings)| (term.as_str(), postings))
    }

    pub fn env_version(&self) -> &BTreeMap<String, u32> {
        &self.env_version
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn object_types(&self) -> &BTreeMap<u32, String> {
        self.objects.object_types()
    }

    pub fn object_names(&self) -> &BTreeMap<u32, ObjectKind> {
        self.objects.object_names()
    }

    pub fn statistics(&self) -> IndexStatistics {
        let postings = self.terms.values().chain(self.title_terms.values());
        let (empty_postings, total_postings) = postings.fold((0, 0), |(empty, total), set| {
            (empty + usize::from(set.is_empty()), total + set.len())
        });

        IndexStatistics {
            document_count: self.documents.len(),
            term_count: self.terms.len(),
            title_term_count: self.title_terms.len(),
            empty_postings,
            object_count: self.objects.len(),
            total_postings,
        }
    }
}

fn lookup_in<'a>(table: &'a BTreeMap<String, PostingSet>, term: &str) -> &'a PostingSet {
    if let Some(postings) = table.get(term) {
        return postings;
    }
    TERM_FILTER
        .index_term(term)
        .filter(|normalized| normalized != term)
        .and_then(|normalized| table.get(&normalized))
        .unwrap_or(&EMPTY)
}

fn prefix_union(table: &BTreeMap<String, PostingSet>, prefix: &str) -> PostingSet {
    table
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|(term, _)| term.starts_with(prefix))
        .fold(PostingSet::new(), |acc, (_, postings)| acc.union(postings))
}

fn check_env_version(envversion: &BTreeMap<String, u32>, options: &LoadOptions) -> Result<()> {
    let Some(expected) = options.expected_env_version else {
        return Ok(());
    };
    match envversion.get(GENERATOR_ENV_TAG) {
        Some(&found) if found == expected => Ok(()),
        Some(&found) => Err(DocsearchError::incompatible_version(format!(
            "index has {} env version {}, expected {}",
            GENERATOR_ENV_TAG, found, expected
        ))),
        None => Err(DocsearchError::incompatible_version(format!(
            "index has no {} env version, expected {}",
            GENERATOR_ENV_TAG, expected
        ))),
    }
}

/// Check that every ordinal is in range and return the number of empty
/// posting sets.
fn check_postings(
    field: &str,
    table: &BTreeMap<String, PostingSet>,
    document_count: usize,
) -> Result<usize> {
    let mut empty = 0;
    for (term, postings) in table {
        match postings.max_ordinal() {
            Some(doc) if doc.index() >= document_count => {
                debug!("{} entry `{}` refers to document {}", field, term, doc);
                return Err(DocsearchError::out_of_range(doc.ordinal(), document_count));
            }
            Some(_) => {}
            None => empty += 1,
        }
    }
    Ok(empty)
}
