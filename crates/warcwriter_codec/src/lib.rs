//! # warcwriter codec
//!
//! WARC/1.0 record encoding and gzip member framing.
//!
//! This crate owns the bytes-on-disk format and nothing else:
//! - [`WarcFields`] is an ordered list of named header fields
//! - [`RecordEncoder`] turns fields plus a block into one uncompressed record
//! - [`GzipFramer`] wraps one record into one self-contained gzip member
//! - [`WarcReader`] walks a file of concatenated members back into records
//!
//! ## Record Layout
//!
//! ```text
//! WARC/1.0\r\n
//! <Name>: <Value>\r\n      (repeated)
//! Content-Length: <N>\r\n
//! \r\n
//! <block: N bytes>\r\n\r\n
//! ```
//!
//! A segment file is simply the concatenation of gzip members, one per
//! record, so any gzip-aware WARC reader can consume it.
//!
//! ## Usage
//!
//! ```
//! use warcwriter_codec::{GzipFramer, RecordEncoder, WarcFields, WarcReader};
//!
//! let mut fields = WarcFields::new();
//! fields.push("WARC-Type", "warcinfo");
//! let record = RecordEncoder::new().encode(&fields, b"format: WARC file version 1.0").unwrap();
//! let member = GzipFramer::default().frame(&record).unwrap();
//!
//! let mut reader = WarcReader::new(&member[..]);
//! let decoded = reader.next_record().unwrap().unwrap();
//! assert_eq!(decoded.fields.get("WARC-Type"), Some("warcinfo"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod digest;
mod encoder;
mod error;
mod fields;
mod gzip;

pub use decoder::{DecodedRecord, WarcReader};
pub use digest::{sha256_label, DIGEST_ALGORITHM};
pub use encoder::{RecordEncoder, CONTENT_LENGTH, WARC_VERSION};
pub use error::{CodecError, CodecResult};
pub use fields::{names, WarcFields};
pub use gzip::{CompressionConfig, GzipFramer};

/// Line separator used throughout the WARC format.
pub const CRLF: &str = "\r\n";
