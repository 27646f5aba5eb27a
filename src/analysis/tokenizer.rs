//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline. They split raw
//! text into [`Token`](crate::analysis::token::Token)s that filters then
//! normalize.
//!
//! # Examples
//!
//! ```
//! use docsearch::analysis::tokenizer::Tokenizer;
//! use docsearch::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so that the builder can analyze
/// documents on several threads with one shared tokenizer.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use self::regex::RegexTokenizer;
