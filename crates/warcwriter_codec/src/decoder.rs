//! Reader for segment files made of concatenated gzip members.

use crate::encoder::CONTENT_LENGTH;
use crate::error::{CodecError, CodecResult};
use crate::fields::{names, WarcFields};
use flate2::read::MultiGzDecoder;
use std::io::{self, BufRead, BufReader, Read};

/// Maximum accepted length of one header line.
/// Guards against reading an entire corrupt stream as a single line.
const MAX_LINE_LENGTH: u64 = 64 * 1024;

/// Maximum accepted block length.
/// Prevents allocation-based DoS from untrusted input.
const MAX_BLOCK_LENGTH: usize = 1024 * 1024 * 1024;

/// One record read back from a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Version line, e.g. `WARC/1.0`.
    pub version: String,
    /// Header fields in file order, including `Content-Length`.
    pub fields: WarcFields,
    /// The record block.
    pub block: Vec<u8>,
}

impl DecodedRecord {
    /// Value of `WARC-Type`.
    #[must_use]
    pub fn record_type(&self) -> Option<&str> {
        self.fields.get(names::WARC_TYPE)
    }

    /// Value of `WARC-Record-ID`.
    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        self.fields.get(names::WARC_RECORD_ID)
    }

    /// Value of `WARC-Date`.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.fields.get(names::WARC_DATE)
    }

    /// Value of `WARC-Target-URI`.
    #[must_use]
    pub fn target_uri(&self) -> Option<&str> {
        self.fields.get(names::WARC_TARGET_URI)
    }

    /// Value of `WARC-Concurrent-To`.
    #[must_use]
    pub fn concurrent_to(&self) -> Option<&str> {
        self.fields.get(names::WARC_CONCURRENT_TO)
    }

    /// Value of `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.fields.get(names::CONTENT_TYPE)
    }
}

/// Streams records out of a gzip-framed WARC file.
///
/// The reader is fused: after the first error (typically a truncated
/// trailing member left by an interrupted write) it yields nothing more, so
/// callers can keep every record read before the damage.
///
/// # Example
///
/// ```ignore
/// let file = std::fs::File::open("rec-20240101000000-00000-host.warc.gz")?;
/// for record in WarcReader::new(file) {
///     let record = record?;
///     println!("{:?}", record.record_type());
/// }
/// ```
pub struct WarcReader<R: Read> {
    inner: BufReader<MultiGzDecoder<R>>,
    done: bool,
}

impl<R: Read> WarcReader<R> {
    /// Creates a reader over gzip-framed bytes.
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(MultiGzDecoder::new(reader)),
            done: false,
        }
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` at a clean end of input.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if input ends inside a record and
    /// [`CodecError::InvalidRecord`] for malformed structure.
    pub fn next_record(&mut self) -> CodecResult<Option<DecodedRecord>> {
        if self.done {
            return Ok(None);
        }

        match self.read_one() {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    fn read_one(&mut self) -> CodecResult<Option<DecodedRecord>> {
        let Some(version) = self.read_line("version line")? else {
            return Ok(None);
        };
        if !version.starts_with("WARC/") {
            return Err(CodecError::invalid_record(format!(
                "expected WARC version line, got {version:?}"
            )));
        }

        let mut fields = WarcFields::new();
        loop {
            let line = self
                .read_line("header field")?
                .ok_or_else(|| CodecError::truncated("input ended inside record header"))?;
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| CodecError::invalid_record(format!("malformed field {line:?}")))?;
            fields.push(name.trim(), value.trim());
        }

        let length: usize = fields
            .get(CONTENT_LENGTH)
            .ok_or_else(|| CodecError::invalid_record("missing Content-Length"))?
            .parse()
            .map_err(|_| CodecError::invalid_record("Content-Length is not a number"))?;
        if length > MAX_BLOCK_LENGTH {
            return Err(CodecError::invalid_record(format!(
                "block length {length} exceeds limit {MAX_BLOCK_LENGTH}"
            )));
        }

        let mut block = vec![0u8; length];
        self.inner
            .read_exact(&mut block)
            .map_err(|e| map_io(e, "record block"))?;

        let mut trailer = [0u8; 4];
        self.inner
            .read_exact(&mut trailer)
            .map_err(|e| map_io(e, "record trailer"))?;
        if &trailer != b"\r\n\r\n" {
            return Err(CodecError::invalid_record("missing CRLF CRLF after block"));
        }

        Ok(Some(DecodedRecord {
            version,
            fields,
            block,
        }))
    }

    fn read_line(&mut self, what: &str) -> CodecResult<Option<String>> {
        let mut buf = Vec::new();
        let read = (&mut self.inner)
            .take(MAX_LINE_LENGTH)
            .read_until(b'\n', &mut buf)
            .map_err(|e| map_io(e, what))?;

        if read == 0 {
            return Ok(None);
        }
        if buf.last() != Some(&b'\n') {
            if read as u64 >= MAX_LINE_LENGTH {
                return Err(CodecError::invalid_record(format!("{what} too long")));
            }
            return Err(CodecError::truncated(format!("input ended inside {what}")));
        }

        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|_| CodecError::invalid_record(format!("{what} is not UTF-8")))
    }
}

impl<R: Read> Iterator for WarcReader<R> {
    type Item = CodecResult<DecodedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn map_io(e: io::Error, what: &str) -> CodecError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CodecError::truncated(format!("input ended inside {what}"))
    } else {
        CodecError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GzipFramer, RecordEncoder};
    use proptest::prelude::*;

    fn member(record_type: &str, block: &[u8]) -> Vec<u8> {
        let fields: WarcFields = [
            (names::WARC_TYPE, record_type),
            (names::WARC_RECORD_ID, "<urn:uuid:00000000-0000-0000-0000-000000000000>"),
        ]
        .into_iter()
        .collect();
        let record = RecordEncoder::new().encode(&fields, block).unwrap();
        GzipFramer::default().frame(&record).unwrap()
    }

    #[test]
    fn reads_records_in_order() {
        let mut file = member("warcinfo", b"format: WARC file version 1.0");
        file.extend(member("response", b"HTTP/1.0 200\r\n\r\nbody"));
        file.extend(member("request", b"GET / HTTP/1.0\r\n\r\n"));

        let records: Vec<_> = WarcReader::new(&file[..])
            .collect::<CodecResult<_>>()
            .unwrap();

        let types: Vec<_> = records.iter().map(|r| r.record_type().unwrap()).collect();
        assert_eq!(types, vec!["warcinfo", "response", "request"]);
        assert_eq!(records[1].block, b"HTTP/1.0 200\r\n\r\nbody");
        assert_eq!(records[0].version, "WARC/1.0");
    }

    #[test]
    fn content_length_is_exposed() {
        let file = member("response", b"12345");
        let record = WarcReader::new(&file[..]).next_record().unwrap().unwrap();
        assert_eq!(record.fields.get("Content-Length"), Some("5"));
    }

    #[test]
    fn truncated_trailing_member_keeps_earlier_records() {
        let mut file = member("warcinfo", b"info");
        let second = member("response", &[b'x'; 4096]);
        file.extend_from_slice(&second[..second.len() / 2]);

        let mut reader = WarcReader::new(&file[..]);
        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.record_type(), Some("warcinfo"));

        assert!(reader.next_record().is_err());
        // Fused after the error.
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn rejects_non_warc_content() {
        let data = GzipFramer::default().frame(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        let result = WarcReader::new(&data[..]).next_record();
        assert!(matches!(result, Err(CodecError::InvalidRecord { .. })));
    }

    #[test]
    fn rejects_missing_content_length() {
        let data = GzipFramer::default()
            .frame(b"WARC/1.0\r\nWARC-Type: warcinfo\r\n\r\n")
            .unwrap();
        let result = WarcReader::new(&data[..]).next_record();
        assert!(matches!(result, Err(CodecError::InvalidRecord { .. })));
    }

    #[test]
    fn accessors_read_named_fields() {
        let fields: WarcFields = [
            (names::WARC_TYPE, "request"),
            (names::WARC_DATE, "2024-05-01T10:00:00Z"),
            (names::WARC_TARGET_URI, "http://example.com/"),
            (names::WARC_CONCURRENT_TO, "<urn:uuid:a>"),
            (names::CONTENT_TYPE, "application/http;msgtype=request"),
        ]
        .into_iter()
        .collect();
        let record = RecordEncoder::new().encode(&fields, b"").unwrap();
        let data = GzipFramer::default().frame(&record).unwrap();

        let decoded = WarcReader::new(&data[..]).next_record().unwrap().unwrap();
        assert_eq!(decoded.date(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(decoded.target_uri(), Some("http://example.com/"));
        assert_eq!(decoded.concurrent_to(), Some("<urn:uuid:a>"));
        assert_eq!(decoded.content_type(), Some("application/http;msgtype=request"));
        assert_eq!(decoded.record_id(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn blocks_survive_any_bytes(
            blocks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 1..5)
        ) {
            let mut file = Vec::new();
            for block in &blocks {
                file.extend(member("resource", block));
            }

            let records: Vec<_> = WarcReader::new(&file[..])
                .collect::<CodecResult<_>>()
                .unwrap();
            prop_assert_eq!(records.len(), blocks.len());
            for (record, block) in records.iter().zip(&blocks) {
                prop_assert_eq!(&record.block, block);
            }
        }
    }
}
