//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::args::{DocsearchArgs, OutputFormat};
use crate::error::Result;
use crate::index::{DocumentInfo, IndexStatistics};
use crate::search::SearchHit;

/// A document as printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub ordinal: u32,
    pub docname: String,
    pub filename: String,
    pub title: String,
}

impl From<DocumentInfo<'_>> for DocumentRecord {
    fn from(info: DocumentInfo<'_>) -> Self {
        DocumentRecord {
            ordinal: info.ordinal.ordinal(),
            docname: info.docname.to_string(),
            filename: info.filename.to_string(),
            title: info.title.to_string(),
        }
    }
}

/// Result structure for index builds.
#[derive(Debug, Serialize)]
pub struct BuildResult {
    pub output: String,
    pub format: String,
    pub documents: usize,
    pub pruned: usize,
    pub terms: usize,
    pub title_terms: usize,
    pub duration_ms: u64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,
    pub duration_ms: u64,
}

/// Result structure for term lookups.
#[derive(Debug, Serialize)]
pub struct LookupResult {
    pub term: String,
    pub table: String,
    pub prefix: bool,
    pub documents: Vec<DocumentRecord>,
}

/// Index statistics.
#[derive(Debug, Serialize)]
pub struct StatsResult {
    pub path: String,
    pub format: String,
    #[serde(flatten)]
    pub statistics: IndexStatistics,
    pub env_version: BTreeMap<String, u32>,
}

/// Result structure for index validation.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub path: String,
    pub format: String,
    pub valid: bool,
    pub documents: Option<usize>,
    pub error: Option<String>,
}

/// Result structure for format conversion.
#[derive(Debug, Serialize)]
pub struct ConversionResult {
    pub input: String,
    pub output: String,
    pub from: String,
    pub to: String,
    pub bytes: u64,
}

/// Types that know how to print themselves for people.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &DocsearchArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &DocsearchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

impl HumanOutput for BuildResult {
    fn print_human(&self) {
        println!(
            "Wrote {} index to {} ({} documents, {} terms, {} title terms) in {}ms",
            self.format, self.output, self.documents, self.terms, self.title_terms, self.duration_ms
        );
        if self.pruned > 0 {
            println!("Pruned {} documents", self.pruned);
        }
    }
}

impl HumanOutput for SearchResults {
    fn print_human(&self) {
        println!("Search Results:");
        println!("═══════════════");

        for (i, hit) in self.hits.iter().enumerate() {
            println!();
            println!("Result {}: (Score: {})", i + 1, hit.score);
            println!("─────────────");
            println!("title: {}", hit.title);
            println!("link: {}", hit.link());
            println!("file: {}", hit.filename);
            if let Some(description) = &hit.description {
                println!("description: {description}");
            }
        }

        println!();
        println!("Total hits: {}", self.total_hits);
        println!("Search time: {}ms", self.duration_ms);
    }
}

impl HumanOutput for LookupResult {
    fn print_human(&self) {
        let kind = if self.prefix { "prefix" } else { "term" };
        println!(
            "{} {} `{}`: {} documents",
            self.table,
            kind,
            self.term,
            self.documents.len()
        );
        for document in &self.documents {
            document.print_human();
        }
    }
}

impl HumanOutput for DocumentRecord {
    fn print_human(&self) {
        println!(
            "  #{} {} ({}) {}",
            self.ordinal, self.docname, self.filename, self.title
        );
    }
}

impl HumanOutput for StatsResult {
    fn print_human(&self) {
        println!("Index Statistics:");
        println!("════════════════");
        println!("Path: {} ({})", self.path, self.format);
        println!("Documents: {}", self.statistics.document_count);
        println!("Terms: {}", self.statistics.term_count);
        println!("Title terms: {}", self.statistics.title_term_count);
        println!("Postings: {}", self.statistics.total_postings);
        println!("Empty postings: {}", self.statistics.empty_postings);
        println!("Objects: {}", self.statistics.object_count);
        if !self.env_version.is_empty() {
            println!("Environment:");
            for (name, version) in &self.env_version {
                println!("  {name}: {version}");
            }
        }
    }
}

impl HumanOutput for ValidationResult {
    fn print_human(&self) {
        match (&self.error, self.documents) {
            (None, Some(documents)) => println!(
                "{} is a valid {} index with {} documents",
                self.path, self.format, documents
            ),
            (Some(error), _) => println!("{} is invalid: {}", self.path, error),
            (None, None) => println!("{} is valid", self.path),
        }
    }
}

impl HumanOutput for ConversionResult {
    fn print_human(&self) {
        println!(
            "Converted {} ({}) to {} ({}, {} bytes)",
            self.input, self.from, self.output, self.to, self.bytes
        );
    }
}
