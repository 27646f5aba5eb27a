//! Serialization codecs for search indexes.
//!
//! Three encodings of the same [`IndexData`] tables are supported:
//!
//! - [`IndexFormat::Script`]: `Search.setIndex({...})`, the file a
//!   documentation site ships to browsers.
//! - [`IndexFormat::Json`]: the bare object.
//! - [`IndexFormat::Binary`]: a checksummed bincode image, see [`binary`].
//!
//! Every reader goes through [`SearchIndex::from_data`], so an index loaded
//! from any format has passed the same validation.

pub mod binary;
pub mod json;
pub mod script;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use log::debug;

use crate::config::LoadOptions;
use crate::error::{DocsearchError, Result};
use crate::index::{IndexData, SearchIndex};

/// On-disk encoding of an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    Script,
    Json,
    Binary,
}

impl IndexFormat {
    /// Guess the format from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> IndexFormat {
        if bytes.starts_with(&binary::MAGIC) {
            return IndexFormat::Binary;
        }
        let text = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(bytes);
        let start = text
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(text.len());
        if text[start..].starts_with(script::SCRIPT_PREFIX.as_bytes()) {
            IndexFormat::Script
        } else {
            IndexFormat::Json
        }
    }

    /// Format implied by a file extension: `.js`, `.json` or `.bin`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<IndexFormat> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "js" => Some(IndexFormat::Script),
            "json" => Some(IndexFormat::Json),
            "bin" => Some(IndexFormat::Binary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IndexFormat::Script => "script",
            IndexFormat::Json => "json",
            IndexFormat::Binary => "binary",
        }
    }
}

impl fmt::Display for IndexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexFormat {
    type Err = DocsearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "script" | "js" => Ok(IndexFormat::Script),
            "json" => Ok(IndexFormat::Json),
            "binary" | "bin" => Ok(IndexFormat::Binary),
            other => Err(DocsearchError::invalid_argument(format!(
                "unknown index format `{}`",
                other
            ))),
        }
    }
}

/// Decode raw tables without validating them.
pub fn read_data(bytes: &[u8], options: &LoadOptions) -> Result<IndexData> {
    match IndexFormat::detect(bytes) {
        IndexFormat::Binary => binary::read_binary(bytes, options.verify_checksum),
        IndexFormat::Script => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| DocsearchError::parse(e.valid_up_to(), "index is not valid UTF-8"))?;
            script::read_script(text)
        }
        IndexFormat::Json => json::read_json(bytes),
    }
}

/// Decode and validate an index, detecting its format.
pub fn read_index(bytes: &[u8], options: &LoadOptions) -> Result<SearchIndex> {
    let started = Instant::now();
    let data = read_data(bytes, options)?;
    let index = SearchIndex::from_data(data, options)?;
    debug!(
        "Read {} byte index in {:?}",
        bytes.len(),
        started.elapsed()
    );
    Ok(index)
}

/// Encode an index in the given format.
pub fn write_index(index: &SearchIndex, format: IndexFormat) -> Result<Vec<u8>> {
    let data = index.to_data();
    match format {
        IndexFormat::Script => Ok(script::write_script(&data)?.into_bytes()),
        IndexFormat::Json => json::write_json(&data, false),
        IndexFormat::Binary => binary::write_binary(&data),
    }
}

/// Load an index from a file.
pub fn load_path<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<SearchIndex> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("Loading index from {}", path.display());
    read_index(&bytes, options)
}

/// Save an index to a file. When `format` is `None` it is taken from the
/// file extension, falling back to the script format.
pub fn save_path<P: AsRef<Path>>(
    index: &SearchIndex,
    path: P,
    format: Option<IndexFormat>,
) -> Result<IndexFormat> {
    let path = path.as_ref();
    let format = format
        .or_else(|| IndexFormat::from_path(path))
        .unwrap_or(IndexFormat::Script);
    let bytes = write_index(index, format)?;
    fs::write(path, &bytes)?;
    debug!(
        "Saved {} index ({} bytes) to {}",
        format,
        bytes.len(),
        path.display()
    );
    Ok(format)
}
