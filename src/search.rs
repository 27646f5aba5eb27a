//! Query parsing, matching and ranking.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use docsearch::builder::{IndexBuilder, SourceDocument};
//! use docsearch::search::Searcher;
//!
//! let mut builder = IndexBuilder::new().unwrap();
//! builder
//!     .feed(SourceDocument::new("intro", "intro.md", "Welcome", "Notebooks with MyST"))
//!     .unwrap();
//! let searcher = Searcher::new(Arc::new(builder.freeze().unwrap())).unwrap();
//!
//! let hits = searcher.search("notebook").unwrap();
//! assert_eq!(hits[0].docname, "intro");
//! ```

pub mod hit;
pub mod query;
pub mod searcher;

pub use hit::{HitKind, SearchHit};
pub use query::ParsedQuery;
pub use searcher::Searcher;
