//! Plain JSON: the index object without the script wrapper.

use serde_json::Value;

use crate::error::{DocsearchError, Result};
use crate::index::IndexData;

/// Read index tables from JSON bytes.
///
/// Syntax errors become [`DocsearchError::Parse`] and shape errors become
/// [`DocsearchError::Schema`].
pub fn read_json(bytes: &[u8]) -> Result<IndexData> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        let offset = byte_offset(bytes, e.line(), e.column());
        DocsearchError::parse(offset, e.to_string())
    })?;
    IndexData::from_value(value)
}

/// Write index tables as compact or pretty-printed JSON.
pub fn write_json(data: &IndexData, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(data)?
    } else {
        serde_json::to_vec(data)?
    };
    Ok(bytes)
}

/// Convert serde_json's one-based line and column into a byte offset.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = bytes
        .split(|&b| b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column.saturating_sub(1)).min(bytes.len())
}
