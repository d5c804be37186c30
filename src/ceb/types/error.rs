//! Custom error types for the ceb-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CebError {
    /// The file could not be opened, was empty, or could not be mapped.
    #[error("Failed to open {}: {source}", .path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is structurally invalid: bad signature, short header or
    /// unparseable version text.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// No index entry matched the query, or the index is empty.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A payload extends past the end of the file.
    #[error("Data block out of bounds: offset {offset} + length {length} exceeds file length {file_len}")]
    OutOfBounds {
        offset: u64,
        length: u64,
        file_len: u64,
    },

    /// A lookup key that breaks the plugin-id contract.
    #[error("Invalid index query: {0}")]
    InvalidQuery(String),

    /// The reader is invalid or has been closed.
    #[error("CEB file is not open")]
    NotOpen,
}

/// A convenience `Result` type alias using the crate's `CebError` type.
pub type Result<T> = std::result::Result<T, CebError>;
