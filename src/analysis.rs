//! Text analysis: tokenization, filtering and the analyzers that turn page
//! text and queries into index terms.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, EnglishAnalyzer, PipelineAnalyzer, QueryAnalyzer};
pub use token::{Token, TokenStream};
