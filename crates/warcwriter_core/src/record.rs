//! The archival record, the unit the writer persists.

use crate::id::RecordId;
use crate::types::{RecordType, WarcDate};
use bytes::Bytes;
use warcwriter_codec::{names, sha256_label, WarcFields};

/// One record, fully built and ready to encode.
///
/// Records are built immediately before they are written and dropped right
/// after. The block is the rendered header text followed by the payload; for
/// HTTP records a blank line separates the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivalRecord {
    /// Record kind.
    pub record_type: RecordType,
    /// Unique identifier.
    pub id: RecordId,
    /// Captured URI; absent for `warcinfo`.
    pub target_uri: Option<String>,
    /// `WARC-Date` value.
    pub date: WarcDate,
    /// ID of the paired response, for request records.
    pub concurrent_to: Option<RecordId>,
    /// Segment file name, for `warcinfo` records.
    pub filename: Option<String>,
    /// Rendered header text (HTTP headers or warc-fields lines).
    pub header_block: String,
    /// Captured body bytes.
    pub payload: Bytes,
}

const HTTP_SEPARATOR: &[u8] = b"\r\n\r\n";

impl ArchivalRecord {
    /// `Content-Type` of the record.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.record_type.content_type()
    }

    /// Returns true if the block carries an HTTP message.
    #[must_use]
    pub fn is_http(&self) -> bool {
        !matches!(self.record_type, RecordType::Warcinfo)
    }

    /// Length of [`ArchivalRecord::block`] without building it.
    #[must_use]
    pub fn block_len(&self) -> usize {
        let separator = if self.is_http() { HTTP_SEPARATOR.len() } else { 0 };
        self.header_block.len() + separator + self.payload.len()
    }

    /// Builds the record block.
    #[must_use]
    pub fn block(&self) -> Vec<u8> {
        let mut block = Vec::with_capacity(self.block_len());
        block.extend_from_slice(self.header_block.as_bytes());
        if self.is_http() {
            block.extend_from_slice(HTTP_SEPARATOR);
        }
        block.extend_from_slice(&self.payload);
        block
    }

    /// Builds the WARC header fields for `block`.
    ///
    /// `Content-Length` is left to the encoder.
    #[must_use]
    pub fn fields(&self, block: &[u8]) -> WarcFields {
        let mut fields = WarcFields::new();
        fields.push(names::WARC_TYPE, self.record_type.as_str());
        if let Some(uri) = &self.target_uri {
            fields.push(names::WARC_TARGET_URI, uri.as_str());
        }
        fields.push(names::WARC_DATE, self.date.to_string());
        if let Some(filename) = &self.filename {
            fields.push(names::WARC_FILENAME, filename.as_str());
        }
        fields.push(names::WARC_RECORD_ID, self.id.to_string());
        if let Some(response_id) = &self.concurrent_to {
            fields.push(names::WARC_CONCURRENT_TO, response_id.to_string());
        }
        fields.push(names::CONTENT_TYPE, self.content_type());
        fields.push(names::WARC_BLOCK_DIGEST, sha256_label(block));
        if self.record_type == RecordType::Response {
            fields.push(names::WARC_PAYLOAD_DIGEST, sha256_label(&self.payload));
        }
        fields
    }
}
