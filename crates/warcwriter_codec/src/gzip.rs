//! Gzip member framing.
//!
//! Every record is compressed into its own gzip member. Members are never
//! shared between records, so a reader can resynchronise after a damaged
//! record and a truncated trailing member only loses the last record.

use crate::error::{CodecError, CodecResult};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Compression configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Compression level (0-9, default: 6).
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl CompressionConfig {
    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidLevel`] for levels above 9.
    pub fn validate(&self) -> CodecResult<()> {
        if self.level > 9 {
            return Err(CodecError::InvalidLevel { level: self.level });
        }
        Ok(())
    }

    /// Convert compression level to flate2::Compression
    #[must_use]
    pub fn compression_level(&self) -> Compression {
        match self.level {
            0 => Compression::none(),
            1 => Compression::fast(),
            6 => Compression::default(),
            9 => Compression::best(),
            n => Compression::new(n),
        }
    }
}

/// Wraps one encoded record into one gzip member.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipFramer {
    config: CompressionConfig,
}

impl GzipFramer {
    /// Creates a framer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: CompressionConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> CompressionConfig {
        self.config
    }

    /// Compresses `record` into a self-contained gzip member.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Compression`] if the encoder fails.
    pub fn frame(&self, record: &[u8]) -> CodecResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), self.config.compression_level());
        encoder
            .write_all(record)
            .map_err(|e| CodecError::compression(format!("gzip write failed: {e}")))?;

        encoder
            .finish()
            .map_err(|e| CodecError::compression(format!("gzip finish failed: {e}")))
    }
}
