//! Search results.

use serde::Serialize;

use crate::index::{DocumentInfo, DocumentRef};

/// What a hit points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// A whole page matched the query terms.
    Document,
    /// A domain object (function, class, ...) matched the query.
    Object,
}

/// A single ranked result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub kind: HitKind,
    pub document: DocumentRef,
    pub docname: String,
    pub filename: String,
    /// Page title, or the object's full name for object hits.
    pub title: String,
    /// Anchor inside the page, for object hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// `"{type label}, in {page title}"`, for object hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub score: i32,
}

impl SearchHit {
    pub fn document(info: DocumentInfo<'_>, score: i32) -> Self {
        SearchHit {
            kind: HitKind::Document,
            document: info.ordinal,
            docname: info.docname.to_string(),
            filename: info.filename.to_string(),
            title: info.title.to_string(),
            anchor: None,
            description: None,
            score,
        }
    }

    pub fn object(
        info: DocumentInfo<'_>,
        full_name: String,
        anchor: String,
        label: &str,
        score: i32,
    ) -> Self {
        SearchHit {
            kind: HitKind::Object,
            document: info.ordinal,
            docname: info.docname.to_string(),
            filename: info.filename.to_string(),
            title: full_name,
            anchor: Some(anchor),
            description: Some(format!("{}, in {}", label, info.title)),
            score,
        }
    }

    /// `docname` or `docname#anchor`.
    pub fn link(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.docname, anchor),
            None => self.docname.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Document;

    #[test]
    fn test_links() {
        let document = Document::new("api", "api.rst", "API reference");
        let info = DocumentInfo::new(DocumentRef(3), &document);

        let hit = SearchHit::document(info, 15);
        assert_eq!(hit.link(), "api");
        assert_eq!(hit.title, "API reference");

        let hit = SearchHit::object(
            info,
            "numpy.zeros".to_string(),
            "numpy.zeros".to_string(),
            "Python function",
            26,
        );
        assert_eq!(hit.link(), "api#numpy.zeros");
        assert_eq!(
            hit.description.as_deref(),
            Some("Python function, in API reference")
        );
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let document = Document::new("api", "api.rst", "API");
        let hit = SearchHit::document(DocumentInfo::new(DocumentRef(0), &document), 5);
        let json = serde_json::to_value(&hit).unwrap();

        assert_eq!(json["kind"], "document");
        assert_eq!(json["document"], 0);
        assert!(json.get("anchor").is_none());
    }
}
