//! Command implementations for the docsearch CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use crate::builder::{IndexBuilder, SourceDocument};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::Config;
use crate::error::{DocsearchError, Result};
use crate::format::{self, IndexFormat};
use crate::index::{DocumentRef, PostingSet, SearchIndex};
use crate::search::Searcher;

/// Execute a CLI command.
pub fn execute_command(args: DocsearchArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    match &args.command {
        Command::Build(build_args) => build_index(build_args, &config, &args),
        Command::Search(search_args) => search_index(search_args, &config, &args),
        Command::Lookup(lookup_args) => lookup_term(lookup_args, &config, &args),
        Command::Resolve(resolve_args) => resolve_document(resolve_args, &config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &config, &args),
        Command::Validate(validate_args) => validate_index(validate_args, &config, &args),
        Command::Convert(convert_args) => convert_index(convert_args, &config, &args),
    }
}

/// Build an index from a document file.
fn build_index(args: &BuildArgs, _config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let start_time = Instant::now();
    let documents = read_documents(&args.documents)?;
    info!(
        "Read {} documents from {}",
        documents.len(),
        args.documents.display()
    );

    let mut builder = IndexBuilder::new()?;
    builder.feed_all(documents)?;
    let pruned = if args.keep.is_empty() {
        0
    } else {
        builder.prune(&args.keep)
    };
    let index = builder.freeze()?;
    let format = format::save_path(&index, &args.output, args.to.map(IndexFormat::from))?;
    let statistics = index.statistics();

    output_result(
        "Index built successfully",
        &BuildResult {
            output: args.output.display().to_string(),
            format: format.to_string(),
            documents: statistics.document_count,
            pruned,
            terms: statistics.term_count,
            title_terms: statistics.title_term_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Read documents from a JSON array or a JSON lines file.
pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<Vec<SourceDocument>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read documents from {}", path.display()))?;
    if content.trim_start().starts_with('[') {
        let documents = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse document array in {}", path.display()))?;
        return Ok(documents);
    }

    let mut documents = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let document = serde_json::from_str(line).map_err(|e| {
            DocsearchError::invalid_argument(format!(
                "Error parsing document on line {}: {}",
                line_num + 1,
                e
            ))
        })?;
        documents.push(document);
    }
    Ok(documents)
}

/// Search an index.
fn search_index(args: &SearchArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let index = format::load_path(&args.index, &config.load)?;

    let mut search_config = config.search.clone();
    if let Some(limit) = args.limit {
        search_config.max_results = Some(limit);
    }
    let searcher = Searcher::with_config(Arc::new(index), search_config)?;

    let start_time = Instant::now();
    let hits = searcher.search(&args.query)?;
    let duration = start_time.elapsed();

    output_result(
        "Search completed",
        &SearchResults {
            query: args.query.clone(),
            total_hits: hits.len(),
            hits,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Show the documents that contain a term.
fn lookup_term(args: &LookupArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let index = format::load_path(&args.index, &config.load)?;

    let postings = match (args.title, args.prefix) {
        (false, false) => index.lookup(&args.term).clone(),
        (true, false) => index.lookup_title(&args.term).clone(),
        (false, true) => index.lookup_prefix(&args.term),
        (true, true) => index.lookup_title_prefix(&args.term),
    };

    output_result(
        "Lookup completed",
        &LookupResult {
            term: args.term.clone(),
            table: if args.title { "titleterms" } else { "terms" }.to_string(),
            prefix: args.prefix,
            documents: records(&index, &postings)?,
        },
        cli_args,
    )
}

fn records(index: &SearchIndex, postings: &PostingSet) -> Result<Vec<DocumentRecord>> {
    postings
        .iter()
        .map(|doc| index.resolve(doc).map(DocumentRecord::from))
        .collect()
}

/// Show a single document.
fn resolve_document(args: &ResolveArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let index = format::load_path(&args.index, &config.load)?;
    let record = DocumentRecord::from(index.resolve(DocumentRef(args.ordinal))?);

    output_result("Document resolved", &record, cli_args)
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let bytes = fs::read(&args.index)?;
    let format = IndexFormat::detect(&bytes);
    let index = format::read_index(&bytes, &config.load)?;

    output_result(
        "Index statistics",
        &StatsResult {
            path: args.index.display().to_string(),
            format: format.to_string(),
            statistics: index.statistics(),
            env_version: index.env_version().clone(),
        },
        cli_args,
    )
}

/// Validate an index file.
fn validate_index(args: &ValidateArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let mut options = config.load.clone();
    if let Some(version) = args.expect_env_version {
        options.expected_env_version = Some(version);
    }

    let bytes = fs::read(&args.index)?;
    let format = IndexFormat::detect(&bytes);
    let outcome = format::read_index(&bytes, &options);

    let result = ValidationResult {
        path: args.index.display().to_string(),
        format: format.to_string(),
        valid: outcome.is_ok(),
        documents: outcome.as_ref().ok().map(SearchIndex::document_count),
        error: outcome.as_ref().err().map(ToString::to_string),
    };
    output_result("Validation finished", &result, cli_args)?;

    outcome.map(|_| ())
}

/// Convert an index to another format.
fn convert_index(args: &ConvertArgs, config: &Config, cli_args: &DocsearchArgs) -> Result<()> {
    let bytes = fs::read(&args.index)?;
    let from = IndexFormat::detect(&bytes);
    let index = format::read_index(&bytes, &config.load)?;

    let to = format::save_path(&index, &args.output, args.to.map(IndexFormat::from))?;
    let written = fs::metadata(&args.output)?.len();

    output_result(
        "Index converted",
        &ConversionResult {
            input: args.index.display().to_string(),
            output: args.output.display().to_string(),
            from: from.to_string(),
            to: to.to_string(),
            bytes: written,
        },
        cli_args,
    )
}
