//! Parsing raw query strings.

use crate::analysis::analyzer::QueryAnalyzer;
use crate::error::Result;

/// A query split into normalized terms.
///
/// Words are separated by whitespace. A leading `-` excludes a word. Words
/// whose lowercase form is a stop word are ignored, and punctuation inside a
/// word separates terms, so `np.zeros` requires both `np` and `zero`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    required: Vec<String>,
    excluded: Vec<String>,
    object_words: Vec<String>,
}

impl ParsedQuery {
    pub fn parse(raw: &str, analyzer: &QueryAnalyzer) -> Result<Self> {
        let mut query = ParsedQuery::default();

        for word in raw.split_whitespace() {
            let (excluded, word) = match word.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, word),
            };
            if word.is_empty() || analyzer.is_stop_word(word) {
                continue;
            }
            let pieces = analyzer.words(word)?;
            if pieces.is_empty() {
                continue;
            }

            if !excluded {
                push_unique(&mut query.object_words, word.to_lowercase());
            }

            let target = if excluded {
                &mut query.excluded
            } else {
                &mut query.required
            };
            for piece in pieces {
                if let Some(term) = analyzer.normalize_word(&piece) {
                    push_unique(target, term);
                }
            }
        }

        Ok(query)
    }

    /// Terms every hit must match, in query order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Terms no hit may contain.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Lowercased whole words matched against object names.
    pub fn object_words(&self) -> &[String] {
        &self.object_words
    }

    /// True when nothing in the query can match.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.object_words.is_empty()
    }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedQuery {
        ParsedQuery::parse(raw, &QueryAnalyzer::new().unwrap()).unwrap()
    }

    #[test]
    fn test_required_and_excluded() {
        let query = parse("Markdown notebooks -cells");
        assert_eq!(query.required(), ["markdown", "notebook"]);
        assert_eq!(query.excluded(), ["cell"]);
        assert_eq!(query.object_words(), ["markdown", "notebooks"]);
    }

    #[test]
    fn test_stop_words_and_punctuation() {
        assert!(parse("The of and").is_empty());
        assert!(parse("  ?! ... ").is_empty());
        assert!(parse("").is_empty());
        assert!(parse("-").is_empty());
    }

    #[test]
    fn test_punctuation_splits_terms() {
        let query = parse("np.zeros zeros");
        assert_eq!(query.required(), ["np", "zero"]);
        assert_eq!(query.object_words(), ["np.zeros", "zeros"]);
    }
}
