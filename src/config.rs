//! Configuration for loading and querying indexes.
//!
//! Every structure here deserializes with `#[serde(default)]`, so a config
//! file only needs to name the values it changes.
//!
//! # Examples
//!
//! ```
//! use docsearch::config::SearchConfig;
//!
//! let config = SearchConfig::default();
//! assert_eq!(config.scorer.term, 5);
//! assert_eq!(config.scorer.title, 15);
//!
//! let custom: SearchConfig =
//!     serde_json::from_str(r#"{"scorer": {"title": 30}, "max_results": 5}"#).unwrap();
//! assert_eq!(custom.scorer.title, 30);
//! assert_eq!(custom.scorer.term, 5);
//! assert_eq!(custom.max_results, Some(5));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocsearchError, Result};

/// Environment tag whose version is checked for staleness.
pub const GENERATOR_ENV_TAG: &str = "sphinx";

/// Environment version written by the generator this crate interoperates with.
pub const DEFAULT_ENV_VERSION: u32 = 56;

/// Score weights used to rank hits.
///
/// The defaults are the ones shipped with the documentation search widget,
/// so rankings agree with what site visitors see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scorer {
    /// Exact match of a query term in page text.
    pub term: i32,
    /// Substring match of a query term in page text.
    pub partial_term: i32,
    /// Exact match of a query term in a page title.
    pub title: i32,
    /// Substring match of a query term in a page title.
    pub partial_title: i32,
    /// Object whose full name or last name component equals the query word.
    pub obj_name_match: i32,
    /// Object whose last name component contains the query word.
    pub obj_partial_match: i32,
    /// Extra score per object priority.
    pub obj_prio: BTreeMap<i32, i32>,
    /// Extra score for priorities missing from `obj_prio`.
    pub obj_prio_default: i32,
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer {
            term: 5,
            partial_term: 2,
            title: 15,
            partial_title: 7,
            obj_name_match: 11,
            obj_partial_match: 6,
            obj_prio: BTreeMap::from([(0, 15), (1, 5), (2, -5)]),
            obj_prio_default: 0,
        }
    }
}

impl Scorer {
    /// Extra score for an object priority.
    pub fn object_priority(&self, priority: i32) -> i32 {
        self.obj_prio
            .get(&priority)
            .copied()
            .unwrap_or(self.obj_prio_default)
    }
}

/// Query-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Score weights.
    pub scorer: Scorer,
    /// Minimum term length (in characters) before substring matches are tried.
    pub min_partial_len: usize,
    /// Maximum number of hits to return; `None` returns every hit.
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            scorer: Scorer::default(),
            min_partial_len: 3,
            max_results: None,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make searching meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.min_partial_len == 0 {
            return Err(DocsearchError::invalid_config(
                "min_partial_len must be at least 1",
            ));
        }
        if self.max_results == Some(0) {
            return Err(DocsearchError::invalid_config(
                "max_results must be at least 1 when set",
            ));
        }
        Ok(())
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Options applied while loading a serialized index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Required value of the generator's environment tag. `None` disables the
    /// staleness check.
    pub expected_env_version: Option<u32>,
    /// Verify the CRC32 footer of binary indexes.
    pub verify_checksum: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            expected_env_version: None,
            verify_checksum: true,
        }
    }
}

impl LoadOptions {
    /// Options that require the default generator environment version.
    pub fn strict() -> Self {
        LoadOptions {
            expected_env_version: Some(DEFAULT_ENV_VERSION),
            verify_checksum: true,
        }
    }

    pub fn with_expected_env_version(mut self, version: u32) -> Self {
        self.expected_env_version = Some(version);
        self
    }
}

/// Combined configuration file accepted by the command line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub load: LoadOptions,
}

impl Config {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.search.validate()?;
        Ok(config)
    }
}
