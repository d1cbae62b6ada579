//! Error types for the storage layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting documents.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
