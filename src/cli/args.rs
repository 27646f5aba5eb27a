//! Command line argument parsing for the docsearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::format::IndexFormat;

/// docsearch - Build, inspect and query documentation search indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "docsearch")]
#[command(about = "Build, inspect and query documentation search indexes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DocsearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON) with `search` and `load` sections
    #[arg(short, long, value_name = "CONFIG_FILE", env = "DOCSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DocsearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a JSON or JSONL document file
    Build(BuildArgs),

    /// Search an index
    Search(SearchArgs),

    /// Show the documents containing a term
    Lookup(LookupArgs),

    /// Show the document with a given ordinal
    Resolve(ResolveArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Validate an index file
    Validate(ValidateArgs),

    /// Convert an index to another format
    Convert(ConvertArgs),
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Document file: a JSON array or JSON lines of
    /// `{docname, filename, title, body}`
    #[arg(value_name = "DOCUMENT_FILE")]
    pub documents: PathBuf,

    /// Output index path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Index format (default: from the output extension, else script)
    #[arg(long)]
    pub to: Option<IndexFormatArg>,

    /// Keep only these docnames after feeding
    #[arg(long, value_name = "DOCNAME", num_args = 1..)]
    pub keep: Vec<String>,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Index file path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for term lookup
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Index file path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Term to look up
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Look up title terms instead of page terms
    #[arg(long)]
    pub title: bool,

    /// Treat the term as a prefix
    #[arg(long)]
    pub prefix: bool,
}

/// Arguments for resolving a document ordinal
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Index file path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Document ordinal
    #[arg(value_name = "ORDINAL")]
    pub ordinal: u32,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Index file path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,
}

/// Arguments for index validation
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Index file path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Require this generator environment version
    #[arg(long, value_name = "VERSION")]
    pub expect_env_version: Option<u32>,
}

/// Arguments for format conversion
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Input index path
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Output index path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Target format (default: from the output extension, else script)
    #[arg(long)]
    pub to: Option<IndexFormatArg>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Index file formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormatArg {
    /// `Search.setIndex({...})` script
    Script,
    /// Plain JSON object
    Json,
    /// Checksummed binary
    Binary,
}

impl From<IndexFormatArg> for IndexFormat {
    fn from(format: IndexFormatArg) -> Self {
        match format {
            IndexFormatArg::Script => IndexFormat::Script,
            IndexFormatArg::Json => IndexFormat::Json,
            IndexFormatArg::Binary => IndexFormat::Binary,
        }
    }
}
