//! Error types for the mt103-system library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing, canonicalizing or converting MT103 messages.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing the JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing a CSV batch report.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Block delimiters missing or unbalanced, or block 1, 2 or 4 absent.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A header block does not match its fixed layout.
    #[error("Header parse error in block {block}: {reason}")]
    HeaderParse { block: u8, reason: String },

    /// A line in block 4 looks like a tag marker but the tag syntax is broken.
    #[error("Text block parse error at line {line}: {message}")]
    TextBlockParse { line: usize, message: String },

    /// A recognized tag carries a value that does not match its shape.
    #[error("Field {tag} format error: {message}")]
    FieldFormat { tag: String, message: String },

    /// A well-formed date that cannot be interpreted as a calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A well-formed HHMM time that is not a valid time of day.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// An amount that cannot be interpreted as a decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid output format specified.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl Error {
    pub(crate) fn header(block: u8, reason: impl Into<String>) -> Self {
        Error::HeaderParse {
            block,
            reason: reason.into(),
        }
    }

    pub(crate) fn field(tag: &str, message: impl Into<String>) -> Self {
        Error::FieldFormat {
            tag: tag.to_string(),
            message: message.into(),
        }
    }
}
