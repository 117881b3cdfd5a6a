//! Error types for warcwriter core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while archiving exchanges.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] warcwriter_storage::StorageError),

    /// Record encoding or compression error.
    #[error("codec error: {0}")]
    Codec(#[from] warcwriter_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configured output directory does not exist.
    #[error("output directory not found: {}", path.display())]
    DestinationMissing {
        /// The configured directory.
        path: PathBuf,
    },

    /// A segment with the computed file name already exists.
    #[error("segment file already exists: {}", path.display())]
    Collision {
        /// The path that was about to be created.
        path: PathBuf,
    },

    /// The serial counter has reached the largest value its width can hold.
    #[error("segment serial {serial} exceeds maximum {max}")]
    SerialOverflow {
        /// The serial that would have been assigned.
        serial: u64,
        /// Largest representable serial.
        max: u64,
    },

    /// A captured exchange lacks a required field.
    #[error("malformed record: {message}")]
    MalformedRecord {
        /// What is missing or invalid.
        message: String,
    },

    /// The request carries no shared capture timestamp.
    #[error("missing capture timestamp for {uri}")]
    MissingTimestamp {
        /// URI of the offending request.
        uri: String,
    },

    /// A message exposes headers but is neither a request nor a response.
    #[error("cannot format headers: {message}")]
    Format {
        /// Description of the contract violation.
        message: String,
    },

    /// Writer configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// The writer stopped accepting exchanges after a fatal error.
    #[error("writer halted: {reason}")]
    WriterHalted {
        /// Why the writer stopped.
        reason: String,
    },
}

impl CoreError {
    /// Creates a malformed record error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Creates a missing timestamp error.
    pub fn missing_timestamp(uri: impl Into<String>) -> Self {
        Self::MissingTimestamp { uri: uri.into() }
    }

    /// Creates a header format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the exchange was rejected but the writer can go on.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::MissingTimestamp { .. }
        )
    }

    /// Returns true if the error stops the writer from making progress
    /// until an operator intervenes.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DestinationMissing { .. }
                | Self::Collision { .. }
                | Self::SerialOverflow { .. }
                | Self::WriterHalted { .. }
        )
    }
}
