//! Building records and writing them as gzip members.

use crate::config::{WriterConfig, WARC_FORMAT};
use crate::error::{CoreError, CoreResult};
use crate::exchange::{CapturedRequest, CapturedResponse};
use crate::headers::HeaderFormatter;
use crate::id::{IdGenerator, RecordId};
use crate::record::ArchivalRecord;
use crate::segment::Segment;
use crate::types::{Clock, RecordType, WarcDate};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;
use warcwriter_codec::{GzipFramer, RecordEncoder, CRLF};

/// Builds the three record kinds and appends them to a segment.
///
/// Building and writing are separate steps so a caller can validate and size
/// a whole exchange before anything reaches disk.
#[derive(Debug)]
pub struct RecordSerializer {
    info_block: String,
    formatter: HeaderFormatter,
    encoder: RecordEncoder,
    framer: GzipFramer,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    sync_on_write: bool,
}

impl RecordSerializer {
    /// Creates a serializer for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if the compression level is invalid.
    pub fn new(
        config: &WriterConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> CoreResult<Self> {
        Ok(Self {
            info_block: info_block(config),
            formatter: HeaderFormatter::new(),
            encoder: RecordEncoder::new(),
            framer: GzipFramer::new(config.compression)?,
            ids,
            clock,
            sync_on_write: config.sync_on_write,
        })
    }

    /// Builds the `warcinfo` record for a segment named `file_name`.
    #[must_use]
    pub fn build_segment_info(&self, file_name: &str) -> ArchivalRecord {
        ArchivalRecord {
            record_type: RecordType::Warcinfo,
            id: self.ids.new_id(),
            target_uri: None,
            date: WarcDate::from_datetime(self.clock.now()),
            concurrent_to: None,
            filename: Some(file_name.to_string()),
            header_block: self.info_block.clone(),
            payload: Bytes::new(),
        }
    }

    /// Builds the response record of an exchange.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MalformedRecord`] if the response has no status or no
    ///   body, or its URI contains a line break
    /// - [`CoreError::MissingTimestamp`] if the request carries no capture date
    pub fn build_response(
        &self,
        response: &CapturedResponse,
        request: &CapturedRequest,
    ) -> CoreResult<ArchivalRecord> {
        if response.status.is_none() {
            return Err(CoreError::malformed("response missing HTTP status"));
        }
        let Some(body) = &response.body else {
            return Err(CoreError::malformed("response missing body"));
        };
        let target_uri = checked_uri(&response.uri)?;
        let date = capture_date(request)?;

        Ok(ArchivalRecord {
            record_type: RecordType::Response,
            id: self.ids.new_id(),
            target_uri: Some(target_uri),
            date,
            concurrent_to: None,
            filename: None,
            header_block: self.formatter.format(response)?,
            payload: body.clone(),
        })
    }

    /// Builds the request record of an exchange, linked to `concurrent_to`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MalformedRecord`] if the request has no method or its
    ///   URI contains a line break
    /// - [`CoreError::MissingTimestamp`] if the request carries no capture date
    pub fn build_request(
        &self,
        request: &CapturedRequest,
        concurrent_to: RecordId,
    ) -> CoreResult<ArchivalRecord> {
        if request.method.is_none() {
            return Err(CoreError::malformed("request missing method"));
        }
        let target_uri = checked_uri(&request.uri)?;
        let date = capture_date(request)?;

        Ok(ArchivalRecord {
            record_type: RecordType::Request,
            id: self.ids.new_id(),
            target_uri: Some(target_uri),
            date,
            concurrent_to: Some(concurrent_to),
            filename: None,
            header_block: self.formatter.format(request)?,
            payload: request.body.clone(),
        })
    }

    /// Encodes `record` and compresses it into one gzip member.
    ///
    /// Nothing is written, so a whole exchange can be framed before the
    /// first byte reaches a segment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if a WARC field is invalid or compression
    /// fails.
    pub fn frame_record(&self, record: &ArchivalRecord) -> CoreResult<Vec<u8>> {
        let block = record.block();
        let fields = record.fields(&block);
        let encoded = self.encoder.encode(&fields, &block)?;
        Ok(self.framer.frame(&encoded)?)
    }

    /// Appends a member produced by [`RecordSerializer::frame_record`].
    ///
    /// The segment is flushed afterwards, and synced when configured. A
    /// failed append leaves whatever bytes reached the file in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the append fails.
    pub fn append_framed(
        &self,
        segment: &mut Segment,
        record: &ArchivalRecord,
        member: &[u8],
    ) -> CoreResult<()> {
        segment.append_member(member, self.sync_on_write)?;
        if record.record_type == RecordType::Warcinfo {
            segment.mark_info_written();
        }

        debug!(
            record_type = %record.record_type,
            record_id = %record.id,
            bytes = member.len(),
            segment = segment.file_name(),
            "wrote record"
        );
        Ok(())
    }

    /// Appends `record` to `segment` as one gzip member.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, compression or the append fails.
    pub fn write_record(&self, segment: &mut Segment, record: &ArchivalRecord) -> CoreResult<()> {
        let member = self.frame_record(record)?;
        self.append_framed(segment, record, &member)
    }

    /// Writes the `warcinfo` record that opens `segment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_segment_info(&self, segment: &mut Segment) -> CoreResult<()> {
        let record = self.build_segment_info(segment.file_name());
        self.write_record(segment, &record)
    }

    /// Builds and writes the response record of an exchange.
    ///
    /// # Errors
    ///
    /// See [`RecordSerializer::build_response`] and
    /// [`RecordSerializer::write_record`].
    pub fn write_response(
        &self,
        segment: &mut Segment,
        response: &CapturedResponse,
        request: &CapturedRequest,
    ) -> CoreResult<RecordId> {
        let record = self.build_response(response, request)?;
        self.write_record(segment, &record)?;
        Ok(record.id)
    }

    /// Builds and writes the request record of an exchange.
    ///
    /// # Errors
    ///
    /// See [`RecordSerializer::build_request`] and
    /// [`RecordSerializer::write_record`].
    pub fn write_request(
        &self,
        segment: &mut Segment,
        request: &CapturedRequest,
        concurrent_to: RecordId,
    ) -> CoreResult<RecordId> {
        let record = self.build_request(request, concurrent_to)?;
        self.write_record(segment, &record)?;
        Ok(record.id)
    }
}

fn capture_date(request: &CapturedRequest) -> CoreResult<WarcDate> {
    request
        .capture_date
        .ok_or_else(|| CoreError::missing_timestamp(request.uri.clone()))
}

fn checked_uri(uri: &str) -> CoreResult<String> {
    if uri.contains(['\r', '\n']) {
        return Err(CoreError::malformed(format!(
            "target URI contains a line break: {uri:?}"
        )));
    }
    Ok(uri.to_string())
}

fn info_block(config: &WriterConfig) -> String {
    let lines = [
        ("software", config.software.as_str()),
        ("format", WARC_FORMAT),
        ("conformsTo", config.conforms_to.as_str()),
        ("operator", config.operator.as_str()),
        ("isPartOf", config.collection.as_str()),
        ("description", config.description.as_str()),
        ("robots", config.robots.as_str()),
        ("http-header-user-agent", config.user_agent.as_str()),
    ];
    lines
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(CRLF)
}
