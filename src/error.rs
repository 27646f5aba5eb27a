//! Error types for the docsearch library.
//!
//! All errors are represented by the [`DocsearchError`] enum. Loading an
//! index is all-or-nothing: any of the `Parse`, `Schema`, `OutOfRange`,
//! `IncompatibleVersion` or `Corrupted` variants means the whole artifact was
//! rejected.
//!
//! # Examples
//!
//! ```
//! use docsearch::error::{DocsearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(DocsearchError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docsearch operations.
#[derive(Error, Debug)]
pub enum DocsearchError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The serialized index is not syntactically valid
    #[error("Parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Required fields are missing or have the wrong shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// A document ordinal does not refer to a known document
    #[error("Document ordinal {ordinal} is out of range (index has {count} documents)")]
    OutOfRange { ordinal: u32, count: usize },

    /// The index was produced by an incompatible generator version
    #[error("Incompatible index version: {0}")]
    IncompatibleVersion(String),

    /// Binary payload failed its integrity checks
    #[error("Corrupted index: {0}")]
    Corrupted(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with DocsearchError.
pub type Result<T> = std::result::Result<T, DocsearchError>;

impl DocsearchError {
    /// Create a new parse error at the given byte offset.
    pub fn parse<S: Into<String>>(offset: usize, msg: S) -> Self {
        DocsearchError::Parse {
            offset,
            message: msg.into(),
        }
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        DocsearchError::Schema(msg.into())
    }

    /// Create a new out-of-range error.
    pub fn out_of_range(ordinal: u32, count: usize) -> Self {
        DocsearchError::OutOfRange { ordinal, count }
    }

    /// Create a new incompatible version error.
    pub fn incompatible_version<S: Into<String>>(msg: S) -> Self {
        DocsearchError::IncompatibleVersion(msg.into())
    }

    /// Create a new corruption error.
    pub fn corrupted<S: Into<String>>(msg: S) -> Self {
        DocsearchError::Corrupted(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        DocsearchError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        DocsearchError::InvalidConfig(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DocsearchError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DocsearchError::Other(msg.into())
    }

    /// Whether this error means the serialized index itself was rejected.
    pub fn is_rejected_index(&self) -> bool {
        matches!(
            self,
            DocsearchError::Parse { .. }
                | DocsearchError::Schema(_)
                | DocsearchError::OutOfRange { .. }
                | DocsearchError::IncompatibleVersion(_)
                | DocsearchError::Corrupted(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = DocsearchError::schema("missing field `docnames`");
        assert_eq!(error.to_string(), "Schema error: missing field `docnames`");

        let error = DocsearchError::parse(12, "unexpected token");
        assert_eq!(error.to_string(), "Parse error at byte 12: unexpected token");

        let error = DocsearchError::out_of_range(7, 7);
        assert_eq!(
            error.to_string(),
            "Document ordinal 7 is out of range (index has 7 documents)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = DocsearchError::from(io_error);

        assert!(matches!(error, DocsearchError::Io(_)));
        assert!(!error.is_rejected_index());
    }

    #[test]
    fn test_rejected_index_classification() {
        assert!(DocsearchError::corrupted("bad checksum").is_rejected_index());
        assert!(DocsearchError::incompatible_version("55 != 56").is_rejected_index());
        assert!(!DocsearchError::invalid_argument("empty").is_rejected_index());
    }
}
