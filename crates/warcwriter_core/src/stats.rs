//! Writer statistics.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut writer = WarcWriter::open(config)?;
//! writer.record_exchange(&response, &request)?;
//!
//! let stats = writer.stats();
//! println!("Exchanges: {}", stats.exchanges);
//! println!("Segments: {}", stats.segments_opened);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by a writer.
///
/// All counters are atomic and monotonically increasing, so they can be read
/// from a monitoring thread while the writer is busy.
#[derive(Debug, Default)]
pub struct WriterStats {
    /// Exchanges fully written (response and request).
    exchanges: AtomicU64,
    /// Records of any type written.
    records: AtomicU64,
    /// Segments opened.
    segments_opened: AtomicU64,
    /// Exchanges rejected by validation.
    rejected: AtomicU64,
    /// Compressed bytes appended to segments.
    bytes_written: AtomicU64,
    /// Write or rotation failures.
    errors: AtomicU64,
}

impl WriterStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_exchange(&self) {
        self.exchanges.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_records(&self, count: u64, bytes: u64) {
        self.records.fetch_add(count, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_segment(&self) {
        self.segments_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of exchanges written.
    pub fn exchanges(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Returns the number of records written.
    pub fn records(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }

    /// Returns the number of segments opened.
    pub fn segments_opened(&self) -> u64 {
        self.segments_opened.load(Ordering::Relaxed)
    }

    /// Returns the number of rejected exchanges.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Returns the compressed bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns the number of failed writes or rotations.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            exchanges: self.exchanges(),
            records: self.records(),
            segments_opened: self.segments_opened(),
            rejected: self.rejected(),
            bytes_written: self.bytes_written(),
            errors: self.errors(),
        }
    }
}

/// A point-in-time copy of [`WriterStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Exchanges written.
    pub exchanges: u64,
    /// Records written.
    pub records: u64,
    /// Segments opened.
    pub segments_opened: u64,
    /// Exchanges rejected by validation.
    pub rejected: u64,
    /// Compressed bytes written.
    pub bytes_written: u64,
    /// Failed writes or rotations.
    pub errors: u64,
}
