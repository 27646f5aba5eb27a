//! Analyzers combine a tokenizer with filters to turn raw text into index
//! terms.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`EnglishAnalyzer`](english::EnglishAnalyzer) - Index-side term rule for English pages
//! - [`QueryAnalyzer`](query::QueryAnalyzer) - Query-side normalization matching the index
//!
//! # Examples
//!
//! ```
//! use docsearch::analysis::analyzer::Analyzer;
//! use docsearch::analysis::analyzer::english::EnglishAnalyzer;
//!
//! let analyzer = EnglishAnalyzer::new().unwrap();
//! let terms: Vec<_> = analyzer.analyze("The arrays are here").unwrap().map(|t| t.text).collect();
//!
//! assert_eq!(terms, vec!["The", "arrai", "ar", "here"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can serve several
/// indexing threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod english;
pub mod pipeline;
pub mod query;

pub use english::EnglishAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use query::QueryAnalyzer;
