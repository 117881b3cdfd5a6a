//! WARC record encoder.

use crate::error::{CodecError, CodecResult};
use crate::fields::WarcFields;
use crate::CRLF;

/// Version line written at the top of every record.
pub const WARC_VERSION: &str = "WARC/1.0";

/// Name of the length field appended by the encoder.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Encodes header fields and a block into one uncompressed WARC record.
///
/// The encoder owns `Content-Length`: it is always appended as the last
/// field and always equals the block length. Callers must not set it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordEncoder;

impl RecordEncoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encodes one record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidField`] if a field would break the line
    /// layout or if the caller supplied its own `Content-Length`.
    pub fn encode(&self, fields: &WarcFields, block: &[u8]) -> CodecResult<Vec<u8>> {
        fields.validate()?;
        if fields.contains(CONTENT_LENGTH) {
            return Err(CodecError::invalid_field(
                CONTENT_LENGTH,
                "set by the encoder, not by callers",
            ));
        }

        let length = block.len().to_string();
        let mut out = Vec::with_capacity(Self::encoded_len_hint(fields, block.len()));

        out.extend_from_slice(WARC_VERSION.as_bytes());
        out.extend_from_slice(CRLF.as_bytes());
        fields.write_to(&mut out);
        out.extend_from_slice(CONTENT_LENGTH.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(length.as_bytes());
        out.extend_from_slice(CRLF.as_bytes());
        out.extend_from_slice(CRLF.as_bytes());
        out.extend_from_slice(block);
        out.extend_from_slice(CRLF.as_bytes());
        out.extend_from_slice(CRLF.as_bytes());

        Ok(out)
    }

    fn encoded_len_hint(fields: &WarcFields, block_len: usize) -> usize {
        let header: usize = fields.iter().map(|(n, v)| n.len() + v.len() + 4).sum();
        WARC_VERSION.len() + header + 64 + block_len
    }
}
