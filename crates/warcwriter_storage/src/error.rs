//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Exclusive creation failed because the file is already there.
    #[error("file already exists: {}", path.display())]
    AlreadyExists {
        /// The path that was to be created.
        path: PathBuf,
    },

    /// The storage is closed.
    #[error("storage is closed")]
    Closed,
}
