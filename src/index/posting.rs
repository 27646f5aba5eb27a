//! Posting sets: the documents in which a term occurs.
//!
//! On the wire a posting set is written the way the documentation generator
//! writes it: a bare integer when it holds one document and an array of
//! ordinals otherwise. Readers accept both forms. Binary (non
//! human-readable) formats always use the array form.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::index::document::DocumentRef;

/// Ordered, deduplicated set of document ordinals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PostingSet(Vec<DocumentRef>);

impl PostingSet {
    /// An empty posting set.
    pub const fn new() -> Self {
        PostingSet(Vec::new())
    }

    /// Build a set from raw ordinals, sorting and removing duplicates.
    pub fn from_ordinals<I: IntoIterator<Item = u32>>(ordinals: I) -> Self {
        ordinals.into_iter().map(DocumentRef).collect()
    }

    /// Insert a document. Returns `false` if it was already present.
    pub fn insert(&mut self, doc: DocumentRef) -> bool {
        match self.0.binary_search(&doc) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, doc);
                true
            }
        }
    }

    /// Remove a document. Returns `false` if it was not present.
    pub fn remove(&mut self, doc: DocumentRef) -> bool {
        match self.0.binary_search(&doc) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, doc: DocumentRef) -> bool {
        self.0.binary_search(&doc).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Documents in ascending ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = DocumentRef> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[DocumentRef] {
        &self.0
    }

    /// Highest ordinal in the set.
    pub fn max_ordinal(&self) -> Option<DocumentRef> {
        self.0.last().copied()
    }

    /// Documents present in either set.
    pub fn union(&self, other: &PostingSet) -> PostingSet {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (a, b) = (self.0[i], other.0[j]);
            if a < b {
                merged.push(a);
                i += 1;
            } else if b < a {
                merged.push(b);
                j += 1;
            } else {
                merged.push(a);
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&other.0[j..]);
        PostingSet(merged)
    }

    /// Documents present in both sets.
    pub fn intersection(&self, other: &PostingSet) -> PostingSet {
        PostingSet(
            self.0
                .iter()
                .copied()
                .filter(|doc| other.contains(*doc))
                .collect(),
        )
    }

    /// Rewrite every ordinal through `map`, dropping documents it rejects.
    pub fn remap<F>(&self, map: F) -> PostingSet
    where
        F: Fn(DocumentRef) -> Option<DocumentRef>,
    {
        self.0.iter().copied().filter_map(map).collect()
    }
}

impl FromIterator<DocumentRef> for PostingSet {
    fn from_iter<I: IntoIterator<Item = DocumentRef>>(iter: I) -> Self {
        let mut docs: Vec<DocumentRef> = iter.into_iter().collect();
        docs.sort_unstable();
        docs.dedup();
        PostingSet(docs)
    }
}

impl<'a> IntoIterator for &'a PostingSet {
    type Item = DocumentRef;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocumentRef>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl Serialize for PostingSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() && self.0.len() == 1 {
            serializer.serialize_u32(self.0[0].0)
        } else {
            serializer.collect_seq(self.0.iter().map(|doc| doc.0))
        }
    }
}

struct PostingSetVisitor;

impl<'de> Visitor<'de> for PostingSetVisitor {
    type Value = PostingSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a document ordinal or an array of document ordinals")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<PostingSet, E> {
        let ordinal = u32::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))?;
        Ok(PostingSet(vec![DocumentRef(ordinal)]))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<PostingSet, E> {
        let ordinal = u32::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))?;
        Ok(PostingSet(vec![DocumentRef(ordinal)]))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PostingSet, A::Error> {
        let mut ordinals = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(ordinal) = seq.next_element::<u32>()? {
            ordinals.push(ordinal);
        }
        Ok(PostingSet::from_ordinals(ordinals))
    }
}

impl<'de> Deserialize<'de> for PostingSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(PostingSetVisitor)
        } else {
            deserializer.deserialize_seq(PostingSetVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ordinals_sorts_and_dedups() {
        let set = PostingSet::from_ordinals([5, 1, 3, 1]);
        let ordinals: Vec<u32> = set.iter().map(DocumentRef::ordinal).collect();
        assert_eq!(ordinals, vec![1, 3, 5]);
        assert_eq!(set.max_ordinal(), Some(DocumentRef(5)));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = PostingSet::new();
        assert!(set.insert(DocumentRef(2)));
        assert!(set.insert(DocumentRef(0)));
        assert!(!set.insert(DocumentRef(2)));
        assert_eq!(set.as_slice(), &[DocumentRef(0), DocumentRef(2)]);

        assert!(set.remove(DocumentRef(0)));
        assert!(!set.remove(DocumentRef(0)));
        assert!(set.contains(DocumentRef(2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_union_and_intersection() {
        let a = PostingSet::from_ordinals([0, 2, 4]);
        let b = PostingSet::from_ordinals([1, 2, 5]);

        assert_eq!(a.union(&b), PostingSet::from_ordinals([0, 1, 2, 4, 5]));
        assert_eq!(a.intersection(&b), PostingSet::from_ordinals([2]));
        assert!(a.intersection(&PostingSet::new()).is_empty());
    }

    #[test]
    fn test_remap() {
        let set = PostingSet::from_ordinals([0, 1, 2]);
        let remapped = set.remap(|doc| {
            if doc.0 == 1 {
                None
            } else {
                Some(DocumentRef(10 - doc.0))
            }
        });
        assert_eq!(remapped, PostingSet::from_ordinals([8, 10]));
    }

    #[test]
    fn test_json_compact_form() {
        assert_eq!(
            serde_json::to_string(&PostingSet::from_ordinals([3])).unwrap(),
            "3"
        );
        assert_eq!(
            serde_json::to_string(&PostingSet::from_ordinals([4, 5])).unwrap(),
            "[4,5]"
        );
        assert_eq!(serde_json::to_string(&PostingSet::new()).unwrap(), "[]");
    }

    #[test]
    fn test_json_accepts_both_forms() {
        let single: PostingSet = serde_json::from_str("5").unwrap();
        assert_eq!(single, PostingSet::from_ordinals([5]));

        let many: PostingSet = serde_json::from_str("[3,1]").unwrap();
        assert_eq!(many, PostingSet::from_ordinals([1, 3]));

        assert!(serde_json::from_str::<PostingSet>("-1").is_err());
        assert!(serde_json::from_str::<PostingSet>("\"1\"").is_err());
    }
}
