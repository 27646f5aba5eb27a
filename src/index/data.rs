//! Wire representation of an index.
//!
//! [`IndexData`] mirrors the object passed to `Search.setIndex(...)` field
//! for field. Every codec reads and writes it, and nothing in it is
//! validated until [`SearchIndex::from_data`](crate::index::SearchIndex::from_data)
//! checks it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DocsearchError, Result};
use crate::index::object::{ObjectKind, ObjectMap};
use crate::index::posting::PostingSet;

/// Unvalidated index tables, keyed exactly as in the serialized artifact.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexData {
    pub docnames: Vec<String>,
    #[serde(default)]
    pub envversion: BTreeMap<String, u32>,
    pub filenames: Vec<String>,
    #[serde(default)]
    pub objects: ObjectMap,
    #[serde(default)]
    pub objnames: BTreeMap<String, ObjectKind>,
    #[serde(default)]
    pub objtypes: BTreeMap<String, String>,
    pub terms: BTreeMap<String, PostingSet>,
    pub titles: Vec<String>,
    pub titleterms: BTreeMap<String, PostingSet>,
}

impl IndexData {
    /// Parse index tables from a JSON value, mapping shape errors to
    /// [`DocsearchError::Schema`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| DocsearchError::schema(e.to_string()))
    }
}
