//! The writer facade, one call per captured exchange.

use crate::config::WriterConfig;
use crate::error::{CoreError, CoreResult};
use crate::exchange::{CapturedRequest, CapturedResponse};
use crate::id::{IdGenerator, RecordId, UuidGenerator};
use crate::record::ArchivalRecord;
use crate::segment::{Segment, SegmentManager};
use crate::serializer::RecordSerializer;
use crate::stats::{StatsSnapshot, WriterStats};
use crate::types::{Clock, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

/// What [`WarcWriter::record_exchange`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReceipt {
    /// ID of the response record.
    pub response_id: RecordId,
    /// ID of the request record.
    pub request_id: RecordId,
    /// Segment both records went to.
    pub segment: PathBuf,
    /// Whether a new segment was opened for this exchange.
    pub rotated: bool,
}

/// Archives captured HTTP exchanges into rotating WARC segments.
///
/// `WarcWriter` is the single entry point the crawl engine talks to. For
/// each exchange it:
/// - validates the response and request before touching disk
/// - rotates to a new segment if both records would not fit
/// - writes the segment's `warcinfo` record if it has none yet
/// - writes the response record, then the linked request record
///
/// # Example
///
/// ```rust,ignore
/// use warcwriter_core::{CapturedRequest, CapturedResponse, WarcDate, WarcWriter, WriterConfig};
///
/// let mut writer = WarcWriter::open(WriterConfig::new("archive", 1_000_000_000))?;
///
/// let request = CapturedRequest::new("GET", "http://example.com/").captured_at(WarcDate::now());
/// let response = CapturedResponse::new(200, "http://example.com/").body("<html></html>");
/// let receipt = writer.record_exchange(&response, &request)?;
/// println!("wrote {} to {}", receipt.response_id, receipt.segment.display());
/// ```
///
/// # Failure Model
///
/// Rejected exchanges (`MalformedRecord`, `MissingTimestamp`) write nothing
/// and the writer carries on. Once the serial range is exhausted the writer
/// halts and every later call fails with [`CoreError::WriterHalted`].
#[derive(Debug)]
pub struct WarcWriter {
    manager: SegmentManager,
    serializer: RecordSerializer,
    stats: Arc<WriterStats>,
    halted: Option<String>,
}

impl WarcWriter {
    /// Creates a writer using random record IDs and the system clock.
    ///
    /// No file is created until the first exchange.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the configuration is invalid.
    pub fn open(config: WriterConfig) -> CoreResult<Self> {
        Self::with_parts(config, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Creates a writer with explicit ID and time sources.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the configuration is invalid.
    pub fn with_parts(
        config: WriterConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> CoreResult<Self> {
        config.validate()?;
        let serializer = RecordSerializer::new(&config, ids, Arc::clone(&clock))?;
        let manager = SegmentManager::new(&config, clock);

        Ok(Self {
            manager,
            serializer,
            stats: Arc::new(WriterStats::new()),
            halted: None,
        })
    }

    /// Archives one exchange.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MalformedRecord`] / [`CoreError::MissingTimestamp`] if
    ///   the exchange is incomplete; nothing is written
    /// - [`CoreError::DestinationMissing`], [`CoreError::Collision`] or
    ///   [`CoreError::SerialOverflow`] if a needed rotation fails
    /// - [`CoreError::WriterHalted`] after a serial overflow
    /// - codec errors if a record cannot be encoded; nothing is written
    /// - storage errors if an append fails
    pub fn record_exchange(
        &mut self,
        response: &CapturedResponse,
        request: &CapturedRequest,
    ) -> CoreResult<ExchangeReceipt> {
        if let Some(reason) = &self.halted {
            return Err(CoreError::WriterHalted {
                reason: reason.clone(),
            });
        }

        let result = self.write_exchange(response, request);
        match &result {
            Ok(_) => self.stats.record_exchange(),
            Err(e) if e.is_rejection() => {
                self.stats.record_rejection();
                warn!(uri = %request.uri, error = %e, "exchange rejected");
            }
            Err(e) => {
                self.stats.record_error();
                error!(uri = %request.uri, error = %e, "failed to archive exchange");
                if matches!(e, CoreError::SerialOverflow { .. }) {
                    self.halted = Some(e.to_string());
                }
            }
        }
        result
    }

    fn write_exchange(
        &mut self,
        response: &CapturedResponse,
        request: &CapturedRequest,
    ) -> CoreResult<ExchangeReceipt> {
        let response_record = self.serializer.build_response(response, request)?;
        let request_record = self
            .serializer
            .build_request(request, response_record.id)?;
        let estimate = (response_record.block_len() + request_record.block_len()) as u64;

        // Frame both members before any segment is touched.
        let response_member = self.serializer.frame_record(&response_record)?;
        let request_member = self.serializer.frame_record(&request_record)?;

        let (rotation, segment) = self.manager.segment_for(estimate)?;
        if rotation.rolled {
            self.stats.record_segment();
        }

        let before = segment.appended();
        let mut written = 0;
        let outcome = append_records(
            &self.serializer,
            segment,
            [
                (&response_record, response_member.as_slice()),
                (&request_record, request_member.as_slice()),
            ],
            &mut written,
        );
        self.stats
            .record_records(written, segment.appended() - before);
        outcome?;

        Ok(ExchangeReceipt {
            response_id: response_record.id,
            request_id: request_record.id,
            segment: segment.path().to_path_buf(),
            rotated: rotation.rolled,
        })
    }

    /// Path of the open segment, if any.
    #[must_use]
    pub fn current_segment(&self) -> Option<&Path> {
        self.manager.current().map(Segment::path)
    }

    /// Returns true once the writer has stopped accepting exchanges.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Snapshot of the writer's counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Shared handle to the live counters, for monitoring from another thread.
    #[must_use]
    pub fn stats_handle(&self) -> Arc<WriterStats> {
        Arc::clone(&self.stats)
    }

    /// The segment manager.
    #[must_use]
    pub fn segments(&self) -> &SegmentManager {
        &self.manager
    }

    /// Makes `segment` the open segment; see [`SegmentManager::adopt`].
    pub fn adopt_segment(&mut self, segment: Segment) {
        self.manager.adopt(segment);
    }
}

/// Writes the segment's `warcinfo` if it is still missing, then the framed
/// `records`.
///
/// `written` counts the records that made it, even when a later one fails.
fn append_records(
    serializer: &RecordSerializer,
    segment: &mut Segment,
    records: [(&ArchivalRecord, &[u8]); 2],
    written: &mut u64,
) -> CoreResult<()> {
    if segment.needs_info() {
        serializer.write_segment_info(segment)?;
        *written += 1;
    }
    for (record, member) in records {
        serializer.append_framed(segment, record, member)?;
        *written += 1;
    }
    Ok(())
}
