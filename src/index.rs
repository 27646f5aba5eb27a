//! The index table: documents, term postings and domain objects.

pub mod data;
pub mod document;
pub mod object;
pub mod posting;
pub mod search_index;

pub use data::IndexData;
pub use document::{Document, DocumentInfo, DocumentRef, NO_TITLE};
pub use object::{ObjectEntry, ObjectKind, ObjectRef, ObjectTable};
pub use posting::PostingSet;
pub use search_index::{IndexStatistics, SearchIndex};
