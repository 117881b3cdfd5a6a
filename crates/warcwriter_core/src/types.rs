//! Core type definitions for warcwriter.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A WARC timestamp: UTC, whole seconds, rendered as `YYYY-MM-DDThh:mm:ssZ`.
///
/// The crawl engine stamps one of these on each request before handing the
/// exchange to the writer; the response and request records both copy it
/// verbatim, which is what makes them "concurrent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarcDate(DateTime<Utc>);

impl WarcDate {
    /// Returns the current time, truncated to seconds.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Creates a date from a `DateTime`, dropping sub-second precision.
    #[must_use]
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(0))
    }

    /// Parses an RFC 3339 / ISO-8601 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] if the text is not a timestamp.
    pub fn parse(text: &str) -> CoreResult<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| CoreError::malformed(format!("invalid WARC-Date {text:?}: {e}")))
    }

    /// Returns the underlying `DateTime`.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Renders the compact `YYYYMMDDhhmmss` form used in segment file names.
    #[must_use]
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

impl fmt::Display for WarcDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl FromStr for WarcDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for WarcDate {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

/// The record kinds this writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Segment-level metadata, always the first record of a segment.
    Warcinfo,
    /// A captured HTTP response.
    Response,
    /// A captured HTTP request.
    Request,
}

impl RecordType {
    /// Value written in `WARC-Type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warcinfo => "warcinfo",
            Self::Response => "response",
            Self::Request => "request",
        }
    }

    /// Value written in `Content-Type`.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Warcinfo => "application/warc-fields",
            Self::Response => "application/http;msgtype=response",
            Self::Request => "application/http;msgtype=request",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of wall-clock time for segment names and `warcinfo` dates.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests.
///
/// Clones share the same time, so a test can keep a handle and move time
/// forward while the writer owns another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
