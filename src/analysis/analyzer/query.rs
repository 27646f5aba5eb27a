//! Query-side analyzer.
//!
//! Query words must be reduced to exactly the terms the index builder
//! produced, otherwise recall degrades without any error. This analyzer
//! therefore reuses [`IndexTermFilter`] and only adds one query-specific
//! rule: a word whose lowercase form is a stop word is skipped entirely, so
//! `The` in a query never matches the raw `The` entries of an index.

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::english::IndexTermFilter;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct QueryAnalyzer {
    tokenizer: RegexTokenizer,
    stop_filter: StopFilter,
    term_filter: IndexTermFilter,
}

impl QueryAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(QueryAnalyzer {
            tokenizer: RegexTokenizer::new()?,
            stop_filter: StopFilter::new(),
            term_filter: IndexTermFilter::new(),
        })
    }

    /// True when the word is skipped by queries regardless of case.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_filter.is_stop_word(&word.to_lowercase())
    }

    /// Normalize a single word (no punctuation) into its index term.
    pub fn normalize_word(&self, word: &str) -> Option<String> {
        if word.is_empty() || self.is_stop_word(word) {
            return None;
        }
        self.term_filter.index_term(word)
    }

    /// Split a query fragment on non-word characters and return the raw
    /// words it contains.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.tokenizer.tokenize(text)?.map(|t| t.text).collect())
    }
}

impl Analyzer for QueryAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .tokenizer
            .tokenize(text)?
            .filter_map(|token| {
                let term = self.normalize_word(&token.text)?;
                Some(token.with_text(term))
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "query"
    }
}
