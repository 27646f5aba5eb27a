//! Query execution and ranking.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use log::debug;

use crate::analysis::analyzer::QueryAnalyzer;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::{DocumentRef, PostingSet, SearchIndex};
use crate::search::hit::SearchHit;
use crate::search::query::ParsedQuery;

/// Runs queries against a shared index.
///
/// Scores follow the documentation search widget: an exact term match is
/// worth `term`, an exact title match `title`, and substring matches are
/// only tried for terms without an exact match in that table.
#[derive(Clone, Debug)]
pub struct Searcher {
    index: Arc<SearchIndex>,
    config: SearchConfig,
    analyzer: QueryAnalyzer,
}

impl Searcher {
    pub fn new(index: Arc<SearchIndex>) -> Result<Self> {
        Self::with_config(index, SearchConfig::default())
    }

    pub fn with_config(index: Arc<SearchIndex>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Searcher {
            index,
            config,
            analyzer: QueryAnalyzer::new()?,
        })
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Split and normalize a raw query.
    pub fn parse(&self, raw: &str) -> Result<ParsedQuery> {
        ParsedQuery::parse(raw, &self.analyzer)
    }

    /// Run a query and return ranked hits.
    ///
    /// Object hits and page hits share one ranking: score descending, then
    /// title (case-insensitive), then document ordinal.
    pub fn search(&self, raw: &str) -> Result<Vec<SearchHit>> {
        let started = Instant::now();
        let query = self.parse(raw)?;
        if query.is_empty() {
            debug!("Query `{}` has no searchable words", raw);
            return Ok(Vec::new());
        }

        let mut hits = self.search_objects(&query)?;
        hits.extend(self.search_terms(&query)?);
        hits.sort_by(rank);
        if let Some(max_results) = self.config.max_results {
            hits.truncate(max_results);
        }

        debug!(
            "Query `{}`: {} required, {} excluded terms, {} hits in {:?}",
            raw,
            query.required().len(),
            query.excluded().len(),
            hits.len(),
            started.elapsed()
        );
        Ok(hits)
    }

    fn search_terms(&self, query: &ParsedQuery) -> Result<Vec<SearchHit>> {
        let mut matched: Option<AHashMap<DocumentRef, i32>> = None;
        for term in query.required() {
            let candidates = self.term_candidates(term);
            if candidates.is_empty() {
                debug!("Required term `{}` matches nothing", term);
                return Ok(Vec::new());
            }
            matched = Some(match matched {
                None => candidates,
                Some(previous) => previous
                    .into_iter()
                    .filter_map(|(doc, score)| {
                        candidates.get(&doc).map(|other| (doc, score.max(*other)))
                    })
                    .collect(),
            });
        }

        let Some(matched) = matched else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::with_capacity(matched.len());
        for (doc, score) in matched {
            if self.is_excluded(query, doc) {
                continue;
            }
            hits.push(SearchHit::document(self.index.resolve(doc)?, score));
        }
        Ok(hits)
    }

    /// Best score per document for one required term.
    fn term_candidates(&self, term: &str) -> AHashMap<DocumentRef, i32> {
        let scorer = &self.config.scorer;
        let partial = term.chars().count() >= self.config.min_partial_len;
        let mut candidates = AHashMap::new();

        let exact_term = self.index.term_postings(term);
        let exact_title = self.index.title_term_postings(term);
        add_postings(&mut candidates, exact_term, scorer.term);
        add_postings(&mut candidates, exact_title, scorer.title);

        if partial && exact_term.is_none() {
            for (other, postings) in self.index.terms() {
                if other.contains(term) {
                    add_postings(&mut candidates, Some(postings), scorer.partial_term);
                }
            }
        }
        if partial && exact_title.is_none() {
            for (other, postings) in self.index.title_terms() {
                if other.contains(term) {
                    add_postings(&mut candidates, Some(postings), scorer.partial_title);
                }
            }
        }

        candidates
    }

    fn is_excluded(&self, query: &ParsedQuery, doc: DocumentRef) -> bool {
        query.excluded().iter().any(|term| {
            self.index
                .term_postings(term)
                .is_some_and(|postings| postings.contains(doc))
                || self
                    .index
                    .title_term_postings(term)
                    .is_some_and(|postings| postings.contains(doc))
        })
    }

    fn search_objects(&self, query: &ParsedQuery) -> Result<Vec<SearchHit>> {
        let objects = self.index.objects();
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let scorer = &self.config.scorer;
        let words = query.object_words();
        let mut hits = Vec::new();

        for (position, word) in words.iter().enumerate() {
            let others: Vec<&str> = words
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != position)
                .map(|(_, other)| other.as_str())
                .collect();

            for object in objects.iter() {
                let full_name = object.full_name();
                let lower = full_name.to_lowercase();
                if !lower.contains(word.as_str()) {
                    continue;
                }

                let last = lower.rsplit('.').next().unwrap_or(lower.as_str());
                let mut score = 0;
                if lower == *word || last == word.as_str() {
                    score += scorer.obj_name_match;
                } else if last.contains(word.as_str()) {
                    score += scorer.obj_partial_match;
                }

                let info = self.index.resolve(object.entry.document)?;
                if !others.is_empty() {
                    let haystack = format!(
                        "{} {} {} {}",
                        object.prefix, object.name, object.kind.label, info.title
                    )
                    .to_lowercase();
                    if !others.iter().all(|other| haystack.contains(other)) {
                        continue;
                    }
                }

                score += scorer.object_priority(object.entry.priority);
                hits.push(SearchHit::object(
                    info,
                    full_name,
                    object.anchor(),
                    &object.kind.label,
                    score,
                ));
            }
        }

        Ok(hits)
    }
}

fn add_postings(
    candidates: &mut AHashMap<DocumentRef, i32>,
    postings: Option<&PostingSet>,
    score: i32,
) {
    for doc in postings.into_iter().flatten() {
        candidates
            .entry(doc)
            .and_modify(|best| *best = (*best).max(score))
            .or_insert(score);
    }
}

fn rank(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.document.cmp(&b.document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{IndexBuilder, SourceDocument};
    use crate::index::ObjectKind;
    use crate::search::hit::HitKind;

    fn index() -> Arc<SearchIndex> {
        let mut builder = IndexBuilder::new().unwrap();
        builder
            .feed_all(vec![
                SourceDocument::new("intro", "intro.md", "Welcome", "Notebooks and markdown files"),
                SourceDocument::new("markdown", "markdown.md", "Markdown Files", "Writing markdown"),
                SourceDocument::new("notebooks", "notebooks.ipynb", "Notebooks", "Plots with arrays"),
            ])
            .unwrap();
        Arc::new(builder.freeze().unwrap())
    }

    fn titles(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|hit| hit.title.as_str()).collect()
    }

    #[test]
    fn test_title_matches_rank_first() {
        let searcher = Searcher::new(index()).unwrap();
        let hits = searcher.search("markdown").unwrap();

        assert_eq!(titles(&hits), vec!["Markdown Files", "Welcome"]);
        assert_eq!(hits[0].score, 15);
        assert_eq!(hits[1].score, 5);
        assert!(hits.iter().all(|hit| hit.kind == HitKind::Document));
    }

    #[test]
    fn test_required_terms_are_anded() {
        let searcher = Searcher::new(index()).unwrap();
        let hits = searcher.search("notebooks markdown").unwrap();
        assert_eq!(titles(&hits), vec!["Welcome"]);

        assert!(searcher.search("markdown unknownword").unwrap().is_empty());
        assert!(searcher.search("unknownword markdown").unwrap().is_empty());
    }

    #[test]
    fn test_excluded_terms() {
        let searcher = Searcher::new(index()).unwrap();
        let hits = searcher.search("markdown -notebooks").unwrap();
        assert_eq!(titles(&hits), vec!["Markdown Files"]);
    }

    #[test]
    fn test_partial_matches() {
        let searcher = Searcher::new(index()).unwrap();
        let hits = searcher.search("note").unwrap();

        assert_eq!(titles(&hits), vec!["Notebooks", "Welcome"]);
        assert_eq!(hits[0].score, 7);
        assert_eq!(hits[1].score, 2);

        assert!(searcher.search("no").unwrap().is_empty());
    }

    #[test]
    fn test_stop_words_only() {
        let searcher = Searcher::new(index()).unwrap();
        assert!(searcher.search("the and of").unwrap().is_empty());
        assert!(searcher.search("?! ...").unwrap().is_empty());
        assert!(searcher.search("").unwrap().is_empty());
    }

    #[test]
    fn test_max_results() {
        let config = SearchConfig::default().with_max_results(1);
        let searcher = Searcher::with_config(index(), config).unwrap();
        assert_eq!(searcher.search("markdown").unwrap().len(), 1);
    }

    #[test]
    fn test_ties_break_on_title() {
        let searcher = Searcher::new(index()).unwrap();
        let hits = searcher.search("welcome notebooks").unwrap();
        assert_eq!(titles(&hits), vec!["Welcome"]);

        let mut builder = IndexBuilder::new().unwrap();
        builder
            .feed_all(vec![
                SourceDocument::new("b", "b.md", "beta", "shared"),
                SourceDocument::new("a", "a.md", "Alpha", "shared"),
                SourceDocument::new("c", "c.md", "alpha", "shared"),
            ])
            .unwrap();
        let searcher = Searcher::new(Arc::new(builder.freeze().unwrap())).unwrap();
        let hits = searcher.search("shared").unwrap();
        assert_eq!(titles(&hits), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_object_search() {
        let mut builder = IndexBuilder::new().unwrap();
        builder
            .feed_all(vec![
                SourceDocument::new("api", "api.rst", "API reference", "Array creation"),
                SourceDocument::new("guide", "guide.rst", "Guide", "Use zeros to start"),
            ])
            .unwrap();
        let function = ObjectKind::new("py", "function", "Python function");
        builder
            .add_object("api", "numpy", "zeros", function.clone(), 1, "")
            .unwrap();
        builder
            .add_object("api", "numpy", "zeros_like", function, 1, "-")
            .unwrap();
        let searcher = Searcher::new(Arc::new(builder.freeze().unwrap())).unwrap();

        let hits = searcher.search("zeros").unwrap();
        assert_eq!(titles(&hits), vec!["numpy.zeros", "numpy.zeros_like", "Guide"]);
        assert_eq!(hits[0].score, 11 + 5);
        assert_eq!(hits[0].anchor.as_deref(), Some("numpy.zeros"));
        assert_eq!(hits[1].score, 6 + 5);
        assert_eq!(hits[1].anchor.as_deref(), Some("function-numpy.zeros_like"));
        assert_eq!(hits[2].kind, HitKind::Document);

        let hits = searcher.search("zeros reference").unwrap();
        assert_eq!(titles(&hits), vec!["numpy.zeros", "numpy.zeros_like"]);
    }
}
