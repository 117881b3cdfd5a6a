//! Segment file names.
//!
//! Names follow the draintasker convention
//! `{prefix}-{YYYYMMDDhhmmss}-{serial}-{host}.warc.gz` so that segments sort
//! by creation time and serial within one prefix.

use crate::types::WarcDate;
use chrono::NaiveDateTime;
use std::fmt;

/// File extension of every segment.
pub const SEGMENT_EXTENSION: &str = ".warc.gz";

const TIMESTAMP_LEN: usize = 14;

/// The components of a segment file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentName {
    /// Naming prefix.
    pub prefix: String,
    /// Creation time.
    pub created: WarcDate,
    /// Segment serial.
    pub serial: u64,
    /// Zero-padding width of the serial.
    pub width: usize,
    /// Short host name.
    pub host: String,
}

impl SegmentName {
    /// Parses a segment file name.
    ///
    /// Returns `None` if `name` does not follow the segment naming scheme.
    /// The prefix and host may themselves contain `-`; the timestamp and
    /// serial are located as the first pair of all-digit parts that fit.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(SEGMENT_EXTENSION)?;
        let parts: Vec<&str> = stem.split('-').collect();

        let at = (1..parts.len().saturating_sub(2)).find(|&i| {
            parts[i].len() == TIMESTAMP_LEN
                && is_digits(parts[i])
                && is_digits(parts[i + 1])
        })?;

        let created = NaiveDateTime::parse_from_str(parts[at], "%Y%m%d%H%M%S")
            .ok()?
            .and_utc();
        let serial = parts[at + 1].parse().ok()?;

        Some(Self {
            prefix: parts[..at].join("-"),
            created: WarcDate::from_datetime(created),
            serial,
            width: parts[at + 1].len(),
            host: parts[at + 2..].join("-"),
        })
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:0width$}-{}{SEGMENT_EXTENSION}",
            self.prefix,
            self.created.compact(),
            self.serial,
            self.host,
            width = self.width
        )
    }
}
