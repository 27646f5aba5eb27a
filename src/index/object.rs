//! Domain objects: API entries (functions, classes, options, ...) that a
//! documentation generator records so searches can jump straight to their
//! definition.
//!
//! On the wire an object is `[doc ordinal, objtype index, priority, anchor]`
//! grouped under a prefix such as a module name, `objtypes` maps an objtype
//! index to `"domain:type"` and `objnames` maps it to
//! `[domain, type, human label]`. Object maps are keyed by strings in JSON;
//! [`ObjectTable`] parses those keys once at load time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DocsearchError, Result};
use crate::index::document::DocumentRef;

/// A single object definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32, i32, String)", into = "(u32, u32, i32, String)")]
pub struct ObjectEntry {
    /// Document holding the definition.
    pub document: DocumentRef,
    /// Index into the object type tables.
    pub objtype: u32,
    /// Search priority; lower values rank higher.
    pub priority: i32,
    /// Anchor inside the page. `""` means the full name, `"-"` means
    /// `"{type}-{full name}"`.
    pub anchor: String,
}

impl ObjectEntry {
    pub fn new<A: Into<String>>(document: DocumentRef, objtype: u32, priority: i32, anchor: A) -> Self {
        ObjectEntry {
            document,
            objtype,
            priority,
            anchor: anchor.into(),
        }
    }
}

impl From<(u32, u32, i32, String)> for ObjectEntry {
    fn from((document, objtype, priority, anchor): (u32, u32, i32, String)) -> Self {
        ObjectEntry {
            document: DocumentRef(document),
            objtype,
            priority,
            anchor,
        }
    }
}

impl From<ObjectEntry> for (u32, u32, i32, String) {
    fn from(entry: ObjectEntry) -> Self {
        (
            entry.document.ordinal(),
            entry.objtype,
            entry.priority,
            entry.anchor,
        )
    }
}

/// Human-readable description of an object type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct ObjectKind {
    /// Domain, e.g. `py`.
    pub domain: String,
    /// Type within the domain, e.g. `function`.
    pub name: String,
    /// Label shown to readers, e.g. `Python function`.
    pub label: String,
}

impl ObjectKind {
    pub fn new<D, N, L>(domain: D, name: N, label: L) -> Self
    where
        D: Into<String>,
        N: Into<String>,
        L: Into<String>,
    {
        ObjectKind {
            domain: domain.into(),
            name: name.into(),
            label: label.into(),
        }
    }

    /// The `domain:type` form stored in `objtypes`.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.domain, self.name)
    }
}

impl From<(String, String, String)> for ObjectKind {
    fn from((domain, name, label): (String, String, String)) -> Self {
        ObjectKind { domain, name, label }
    }
}

impl From<ObjectKind> for (String, String, String) {
    fn from(kind: ObjectKind) -> Self {
        (kind.domain, kind.name, kind.label)
    }
}

/// Object tables exactly as they appear in a serialized index.
pub type ObjectMap = BTreeMap<String, BTreeMap<String, ObjectEntry>>;

/// A borrowed view of one object with its resolved type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    pub prefix: &'a str,
    pub name: &'a str,
    pub entry: &'a ObjectEntry,
    pub kind: &'a ObjectKind,
}

impl ObjectRef<'_> {
    /// `prefix.name`, or just `name` under the empty prefix.
    pub fn full_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.prefix, self.name)
        }
    }

    /// The page anchor with the shorthand forms expanded.
    pub fn anchor(&self) -> String {
        match self.entry.anchor.as_str() {
            "" => self.full_name(),
            "-" => format!("{}-{}", self.kind.name, self.full_name()),
            anchor => anchor.to_string(),
        }
    }
}

/// Validated domain object tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectTable {
    objects: ObjectMap,
    objtypes: BTreeMap<u32, String>,
    objnames: BTreeMap<u32, ObjectKind>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from its wire form, checking that every object points
    /// at a known document and a known object type.
    pub fn from_wire(
        objects: ObjectMap,
        objtypes: BTreeMap<String, String>,
        objnames: BTreeMap<String, ObjectKind>,
        document_count: usize,
    ) -> Result<Self> {
        let objtypes = parse_keys("objtypes", objtypes)?;
        let objnames = parse_keys("objnames", objnames)?;

        for (prefix, entries) in &objects {
            for (name, entry) in entries {
                if entry.document.index() >= document_count {
                    return Err(DocsearchError::out_of_range(
                        entry.document.ordinal(),
                        document_count,
                    ));
                }
                if !objtypes.contains_key(&entry.objtype) || !objnames.contains_key(&entry.objtype)
                {
                    return Err(DocsearchError::schema(format!(
                        "object `{}` refers to unknown objtype {}",
                        qualify(prefix, name),
                        entry.objtype
                    )));
                }
            }
        }

        Ok(ObjectTable {
            objects,
            objtypes,
            objnames,
        })
    }

    /// Wire form of the tables: `(objects, objtypes, objnames)`.
    pub fn to_wire(
        &self,
    ) -> (
        ObjectMap,
        BTreeMap<String, String>,
        BTreeMap<String, ObjectKind>,
    ) {
        let objtypes = self
            .objtypes
            .iter()
            .map(|(index, name)| (index.to_string(), name.clone()))
            .collect();
        let objnames = self
            .objnames
            .iter()
            .map(|(index, kind)| (index.to_string(), kind.clone()))
            .collect();
        (self.objects.clone(), objtypes, objnames)
    }

    /// Return the index of `kind`, registering it if it is new.
    pub fn intern_kind(&mut self, kind: ObjectKind) -> u32 {
        if let Some((index, _)) = self.objnames.iter().find(|(_, known)| **known == kind) {
            return *index;
        }
        let index = self.objnames.keys().next_back().map_or(0, |last| last + 1);
        self.objtypes.insert(index, kind.qualified_name());
        self.objnames.insert(index, kind);
        index
    }

    /// Insert or replace an object. The entry's objtype must already be
    /// interned.
    pub fn insert<P, N>(&mut self, prefix: P, name: N, entry: ObjectEntry) -> Result<()>
    where
        P: Into<String>,
        N: Into<String>,
    {
        if !self.objnames.contains_key(&entry.objtype) {
            return Err(DocsearchError::invalid_argument(format!(
                "objtype {} has not been registered",
                entry.objtype
            )));
        }
        self.objects
            .entry(prefix.into())
            .or_default()
            .insert(name.into(), entry);
        Ok(())
    }

    pub fn kind(&self, objtype: u32) -> Option<&ObjectKind> {
        self.objnames.get(&objtype)
    }

    pub fn type_name(&self, objtype: u32) -> Option<&str> {
        self.objtypes.get(&objtype).map(String::as_str)
    }

    pub fn object_types(&self) -> &BTreeMap<u32, String> {
        &self.objtypes
    }

    pub fn object_names(&self) -> &BTreeMap<u32, ObjectKind> {
        &self.objnames
    }

    /// Every object, ordered by prefix then name.
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef<'_>> + '_ {
        self.objects.iter().flat_map(move |(prefix, entries)| {
            entries.iter().filter_map(move |(name, entry)| {
                let kind = self.objnames.get(&entry.objtype)?;
                Some(ObjectRef {
                    prefix,
                    name,
                    entry,
                    kind,
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.objects.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite document ordinals through `map`, dropping objects whose
    /// document is rejected.
    pub fn remap<F>(&mut self, map: F)
    where
        F: Fn(DocumentRef) -> Option<DocumentRef>,
    {
        for entries in self.objects.values_mut() {
            entries.retain(|_, entry| match map(entry.document) {
                Some(document) => {
                    entry.document = document;
                    true
                }
                None => false,
            });
        }
        self.objects.retain(|_, entries| !entries.is_empty());
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn parse_keys<V>(field: &str, map: BTreeMap<String, V>) -> Result<BTreeMap<u32, V>> {
    map.into_iter()
        .map(|(key, value)| {
            key.parse::<u32>()
                .map(|index| (index, value))
                .map_err(|_| {
                    DocsearchError::schema(format!("`{}` key `{}` is not an objtype index", field, key))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function_kind() -> ObjectKind {
        ObjectKind::new("py", "function", "Python function")
    }

    #[test]
    fn test_entry_wire_form() {
        let entry: ObjectEntry = serde_json::from_str(r#"[2, 0, 1, "-"]"#).unwrap();
        assert_eq!(entry, ObjectEntry::new(DocumentRef(2), 0, 1, "-"));
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"[2,0,1,"-"]"#);

        let kind: ObjectKind =
            serde_json::from_str(r#"["py", "function", "Python function"]"#).unwrap();
        assert_eq!(kind, function_kind());
        assert_eq!(kind.qualified_name(), "py:function");
    }

    #[test]
    fn test_intern_kind() {
        let mut table = ObjectTable::new();
        assert_eq!(table.intern_kind(function_kind()), 0);
        assert_eq!(
            table.intern_kind(ObjectKind::new("py", "class", "Python class")),
            1
        );
        assert_eq!(table.intern_kind(function_kind()), 0);
        assert_eq!(table.type_name(1), Some("py:class"));
    }

    #[test]
    fn test_insert_requires_known_kind() {
        let mut table = ObjectTable::new();
        let entry = ObjectEntry::new(DocumentRef(0), 3, 1, "");
        assert!(table.insert("numpy", "zeros", entry).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_anchor_expansion() {
        let mut table = ObjectTable::new();
        let objtype = table.intern_kind(function_kind());
        table
            .insert("numpy", "zeros", ObjectEntry::new(DocumentRef(0), objtype, 1, ""))
            .unwrap();
        table
            .insert("numpy", "ones", ObjectEntry::new(DocumentRef(0), objtype, 1, "-"))
            .unwrap();
        table
            .insert("", "empty", ObjectEntry::new(DocumentRef(0), objtype, 1, "custom"))
            .unwrap();

        let anchors: Vec<(String, String)> = table
            .iter()
            .map(|object| (object.full_name(), object.anchor()))
            .collect();
        assert_eq!(
            anchors,
            vec![
                ("empty".to_string(), "custom".to_string()),
                ("numpy.ones".to_string(), "function-numpy.ones".to_string()),
                ("numpy.zeros".to_string(), "numpy.zeros".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_wire_validation() {
        let mut objects = ObjectMap::new();
        objects
            .entry("numpy".to_string())
            .or_default()
            .insert("zeros".to_string(), ObjectEntry::new(DocumentRef(1), 0, 1, ""));
        let objtypes = BTreeMap::from([("0".to_string(), "py:function".to_string())]);
        let objnames = BTreeMap::from([("0".to_string(), function_kind())]);

        let table =
            ObjectTable::from_wire(objects.clone(), objtypes.clone(), objnames.clone(), 2).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.to_wire(), (objects.clone(), objtypes.clone(), objnames.clone()));

        assert!(matches!(
            ObjectTable::from_wire(objects.clone(), objtypes.clone(), objnames.clone(), 1),
            Err(DocsearchError::OutOfRange { ordinal: 1, count: 1 })
        ));
        assert!(matches!(
            ObjectTable::from_wire(objects, objtypes, BTreeMap::new(), 2),
            Err(DocsearchError::Schema(_))
        ));
    }

    #[test]
    fn test_remap_drops_rejected_documents() {
        let mut table = ObjectTable::new();
        let objtype = table.intern_kind(function_kind());
        table
            .insert("a", "f", ObjectEntry::new(DocumentRef(0), objtype, 1, ""))
            .unwrap();
        table
            .insert("b", "g", ObjectEntry::new(DocumentRef(1), objtype, 1, ""))
            .unwrap();

        table.remap(|doc| (doc.0 == 1).then_some(DocumentRef(0)));

        let names: Vec<String> = table.iter().map(|object| object.full_name()).collect();
        assert_eq!(names, vec!["b.g"]);
        assert_eq!(table.iter().next().unwrap().entry.document, DocumentRef(0));
    }
}
