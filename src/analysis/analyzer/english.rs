//! English analyzer used when building documentation indexes.
//!
//! Every `\w+` word `w` of a page becomes at most one index term:
//!
//! 1. `s = porter(lowercase(w))`; if `s` is acceptable, index `s`;
//! 2. otherwise, if `w` itself is acceptable, index `w` unchanged;
//! 3. otherwise drop the word.
//!
//! A word is acceptable when it is non-empty, is not a one or two character
//! hiragana word, and is not a (case-sensitive) stop word starting with a
//! Latin-1 character. Step 2 is why capitalized stop words such as `The` or
//! `In` show up verbatim in real indexes.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::stem::{PorterStemmer, Stemmer};
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// Filter applying the stem-or-keep rule described in the module docs.
#[derive(Clone, Debug, Default)]
pub struct IndexTermFilter {
    stemmer: PorterStemmer,
    stop_filter: StopFilter,
}

impl IndexTermFilter {
    pub fn new() -> Self {
        IndexTermFilter {
            stemmer: PorterStemmer::new(),
            stop_filter: StopFilter::new(),
        }
    }

    /// Whether `word` may be stored as an index term.
    pub fn is_acceptable(&self, word: &str) -> bool {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        let short = word.chars().count() < 3;
        if short && ('\u{3042}'..='\u{3093}').contains(&first) {
            return false;
        }

        !((first as u32) < 256 && self.stop_filter.is_stop_word(word))
    }

    /// The index term for a raw word, if any.
    pub fn index_term(&self, word: &str) -> Option<String> {
        let stemmed = self.stemmer.stem(word);
        if self.is_acceptable(&stemmed) {
            Some(stemmed)
        } else if self.is_acceptable(word) {
            Some(word.to_string())
        } else {
            None
        }
    }
}

impl Filter for IndexTermFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter_map(|token| {
                if token.is_stopped() {
                    return None;
                }
                let term = self.index_term(&token.text)?;
                Some(token.with_text(term))
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "index_term"
    }
}

/// Index-side analyzer for English documentation pages.
pub struct EnglishAnalyzer {
    inner: PipelineAnalyzer,
}

impl EnglishAnalyzer {
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(IndexTermFilter::new()))
            .with_name("english");

        Ok(Self { inner: analyzer })
    }
}

impl Analyzer for EnglishAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

impl Debug for EnglishAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
