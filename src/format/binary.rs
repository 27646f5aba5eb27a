//! Checksummed binary index files.
//!
//! ```text
//! +--------+---------+-------------+---------------------+-------------+
//! | "DSIX" | version | payload len | bincode payload     | crc32       |
//! | 4 B    | u8      | u64 LE      | IndexData (serde)   | u32 LE      |
//! +--------+---------+-------------+---------------------+-------------+
//! ```
//!
//! The checksum covers the payload only. A file whose declared length does
//! not match its actual length is rejected before decoding.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::{DocsearchError, Result};
use crate::index::IndexData;

/// Leading bytes of every binary index.
pub const MAGIC: [u8; 4] = *b"DSIX";

/// Current layout version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 4 + 1 + 8;
const FOOTER_LEN: usize = 4;

/// Encode index tables into a binary file image.
pub fn write_binary(data: &IndexData) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(data, bincode::config::standard())
        .map_err(|e| DocsearchError::other(format!("Failed to encode index: {e}")))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
    out.write_all(&MAGIC)?;
    out.write_u8(FORMAT_VERSION)?;
    out.write_u64::<LittleEndian>(payload.len() as u64)?;
    out.write_all(&payload)?;
    out.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;

    debug!("Encoded binary index: {} payload bytes", payload.len());
    Ok(out)
}

/// Decode index tables from a binary file image.
pub fn read_binary(bytes: &[u8], verify_checksum: bool) -> Result<IndexData> {
    if bytes.len() < HEADER_LEN + FOOTER_LEN {
        return Err(DocsearchError::corrupted(format!(
            "file is truncated ({} bytes)",
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(DocsearchError::corrupted("bad magic number"));
    }

    let version = cursor.read_u8()?;
    if version != FORMAT_VERSION {
        return Err(DocsearchError::incompatible_version(format!(
            "binary format version {} is not supported (expected {})",
            version, FORMAT_VERSION
        )));
    }

    let payload_len = cursor.read_u64::<LittleEndian>()?;
    let expected_len = usize::try_from(payload_len)
        .ok()
        .and_then(|len| len.checked_add(HEADER_LEN + FOOTER_LEN));
    if expected_len != Some(bytes.len()) {
        return Err(DocsearchError::corrupted(format!(
            "declared payload of {} bytes does not fit a {} byte file",
            payload_len,
            bytes.len()
        )));
    }

    let payload_end = bytes.len() - FOOTER_LEN;
    let payload = &bytes[HEADER_LEN..payload_end];
    let stored = (&bytes[payload_end..]).read_u32::<LittleEndian>()?;
    if verify_checksum {
        let actual = crc32fast::hash(payload);
        if actual != stored {
            return Err(DocsearchError::corrupted(format!(
                "checksum mismatch (stored {:08x}, computed {:08x})",
                stored, actual
            )));
        }
    }

    let (data, consumed): (IndexData, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| DocsearchError::corrupted(format!("Failed to decode index: {e}")))?;
    if consumed != payload.len() {
        return Err(DocsearchError::corrupted(format!(
            "{} trailing bytes after payload",
            payload.len() - consumed
        )));
    }

    Ok(data)
}
