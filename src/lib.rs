//! # docsearch
//!
//! Build, load and query the static full-text indexes that documentation
//! site generators ship to browsers (`searchindex.js`).
//!
//! ## Features
//!
//! - Reader and writer for the `Search.setIndex({...})` script format, plain
//!   JSON, and a checksummed binary format
//! - Whole-artifact validation: a malformed index is rejected, never
//!   partially loaded
//! - The generator's English term rule (Porter stemmer and stop list), shared
//!   by the builder and the query side
//! - Widget-compatible query scoring with partial matches, excluded terms and
//!   domain object search

pub mod analysis;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod search;

pub mod prelude {
    pub use crate::builder::{IndexBuilder, SourceDocument};
    pub use crate::config::{LoadOptions, SearchConfig};
    pub use crate::error::{DocsearchError, Result};
    pub use crate::format::{IndexFormat, load_path, read_index, save_path, write_index};
    pub use crate::index::{DocumentRef, PostingSet, SearchIndex};
    pub use crate::search::{SearchHit, Searcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
