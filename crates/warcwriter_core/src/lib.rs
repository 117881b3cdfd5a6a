//! # warcwriter core
//!
//! Archival record writer for captured HTTP exchanges.
//!
//! This crate provides:
//! - Record identifiers and the captured-exchange model
//! - HTTP header rendering for record blocks
//! - Segment rotation with deterministic, collision-safe file names
//! - Record serialization (`warcinfo`, `response`, `request`)
//! - The [`WarcWriter`] facade, called once per exchange
//!
//! ## Record Linkage
//!
//! Each exchange produces a response record followed by its request record
//! in the same segment. Both carry the capture date the crawl engine stamped
//! on the request, and the request's `WARC-Concurrent-To` names the
//! response's `WARC-Record-ID`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod exchange;
mod headers;
mod id;
mod record;
mod segment;
mod serializer;
mod stats;
mod types;
mod writer;

pub use config::{short_hostname, CrawlPolicy, WriterConfig, WARC_FORMAT, WARC_SPEC_URL};
pub use error::{CoreError, CoreResult};
pub use exchange::{
    CapturedRequest, CapturedResponse, Headers, HttpMessage, RequestLine, StatusLine,
};
pub use headers::{request_path, HeaderFormatter, HTTP_VERSION};
pub use id::{IdGenerator, RecordId, SequentialIds, UuidGenerator};
pub use record::ArchivalRecord;
pub use segment::{
    RotationResult, Segment, SegmentManager, SegmentName, WriterState, SEGMENT_EXTENSION,
};
pub use serializer::RecordSerializer;
pub use stats::{StatsSnapshot, WriterStats};
pub use types::{Clock, FixedClock, RecordType, SystemClock, WarcDate};
pub use writer::{ExchangeReceipt, WarcWriter};

/// Crate version, used in the default `software` string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
