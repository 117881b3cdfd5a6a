//! Ordered WARC header fields.

use crate::error::{CodecError, CodecResult};
use crate::CRLF;

/// Standard WARC field names used by this workspace.
pub mod names {
    /// Record type.
    pub const WARC_TYPE: &str = "WARC-Type";
    /// Globally unique record identifier.
    pub const WARC_RECORD_ID: &str = "WARC-Record-ID";
    /// Capture (or write) time.
    pub const WARC_DATE: &str = "WARC-Date";
    /// Captured URI.
    pub const WARC_TARGET_URI: &str = "WARC-Target-URI";
    /// Link from a request record to its response record.
    pub const WARC_CONCURRENT_TO: &str = "WARC-Concurrent-To";
    /// Segment file name, on `warcinfo` records.
    pub const WARC_FILENAME: &str = "WARC-Filename";
    /// Digest of the whole block.
    pub const WARC_BLOCK_DIGEST: &str = "WARC-Block-Digest";
    /// Digest of the HTTP entity body.
    pub const WARC_PAYLOAD_DIGEST: &str = "WARC-Payload-Digest";
    /// MIME type of the block.
    pub const CONTENT_TYPE: &str = "Content-Type";
}

/// An ordered list of `Name: Value` header fields.
///
/// Insertion order is preserved on output. Lookups are case-insensitive on
/// the name, as the WARC format requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarcFields {
    entries: Vec<(String, String)>,
}

impl WarcFields {
    /// Creates an empty field list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the value of the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a field with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every field can be written on a single line.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidField`] for empty names, names containing
    /// `:` or whitespace, or any CR/LF in a name or value.
    pub fn validate(&self) -> CodecResult<()> {
        for (name, value) in &self.entries {
            if name.is_empty() {
                return Err(CodecError::invalid_field(name, "empty name"));
            }
            if name
                .bytes()
                .any(|b| b == b':' || b.is_ascii_whitespace() || b.is_ascii_control())
            {
                return Err(CodecError::invalid_field(
                    name,
                    "name contains a separator or control character",
                ));
            }
            if value.bytes().any(|b| b == b'\r' || b == b'\n') {
                return Err(CodecError::invalid_field(name, "value contains a line break"));
            }
        }
        Ok(())
    }

    /// Writes every field as `Name: Value\r\n` into `out`.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        for (name, value) in &self.entries {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(CRLF.as_bytes());
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for WarcFields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}
