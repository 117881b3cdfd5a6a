//! Error types for the codec crate.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding, compressing or reading records.
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error while reading a segment.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Gzip compression failed.
    #[error("compression failed: {message}")]
    Compression {
        /// Description of the compression error.
        message: String,
    },

    /// Compression settings are out of range.
    #[error("invalid compression level: {level} (max: 9)")]
    InvalidLevel {
        /// The rejected level.
        level: u32,
    },

    /// A header field cannot be written without breaking the record layout.
    #[error("invalid header field {name:?}: {message}")]
    InvalidField {
        /// Field name.
        name: String,
        /// Why the field was rejected.
        message: String,
    },

    /// The stream ended in the middle of a record.
    #[error("truncated record: {message}")]
    Truncated {
        /// What was being read when input ran out.
        message: String,
    },

    /// The bytes do not form a valid WARC record.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the structural error.
        message: String,
    },
}

impl CodecError {
    /// Creates a compression error.
    pub fn compression(message: impl Into<String>) -> Self {
        Self::Compression {
            message: message.into(),
        }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a truncated record error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::Truncated {
            message: message.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }
}
