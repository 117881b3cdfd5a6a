//! Test fixtures and archive helpers.
//!
//! Provides a writer bound to a temporary directory and a frozen clock,
//! plus helpers to read back what it wrote.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use warcwriter_codec::{DecodedRecord, WarcReader};
use warcwriter_core::{
    CapturedRequest, CapturedResponse, FixedClock, IdGenerator, SegmentName, UuidGenerator,
    WarcDate, WarcWriter, WriterConfig, SEGMENT_EXTENSION,
};

/// Host identifier used in fixture segment names.
pub const TEST_HOST: &str = "testhost";

/// 2024-06-01T12:00:00Z, the instant fixture clocks start at.
pub const FIXTURE_EPOCH_SECS: i64 = 1_717_243_200;

/// Returns the instant fixture clocks start at.
pub fn fixture_time() -> DateTime<Utc> {
    DateTime::from_timestamp(FIXTURE_EPOCH_SECS, 0).expect("fixture time is in range")
}

/// A writer over a temporary directory with automatic cleanup.
pub struct TestArchive {
    /// The writer under test.
    pub writer: WarcWriter,
    /// Handle to the writer's clock.
    pub clock: FixedClock,
    /// Kept alive so the directory outlives the writer.
    dir: TempDir,
}

impl TestArchive {
    /// Creates an archive with random record IDs.
    pub fn new(max_segment_size: u64) -> Self {
        Self::with_config(max_segment_size, |config| config)
    }

    /// Creates an archive, letting `tune` adjust the configuration.
    ///
    /// The base configuration uses [`TEST_HOST`] and skips fsync.
    pub fn with_config<F>(max_segment_size: u64, tune: F) -> Self
    where
        F: FnOnce(WriterConfig) -> WriterConfig,
    {
        Self::with_ids(max_segment_size, Arc::new(UuidGenerator), tune)
    }

    /// Creates an archive with an explicit ID source.
    pub fn with_ids<F>(max_segment_size: u64, ids: Arc<dyn IdGenerator>, tune: F) -> Self
    where
        F: FnOnce(WriterConfig) -> WriterConfig,
    {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let config = tune(
            WriterConfig::new(dir.path(), max_segment_size)
                .host(TEST_HOST)
                .sync_on_write(false),
        );
        let clock = FixedClock::new(fixture_time());
        let writer = WarcWriter::with_parts(config, ids, Arc::new(clock.clone()))
            .expect("Failed to open writer");

        Self { writer, clock, dir }
    }

    /// The output directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Segment files in the output directory, ordered by serial.
    pub fn segment_files(&self) -> Vec<PathBuf> {
        list_segments(self.dir.path())
    }

    /// Every record in the archive with the segment it came from, in
    /// serial then file order.
    pub fn all_records(&self) -> Vec<(PathBuf, DecodedRecord)> {
        self.segment_files()
            .into_iter()
            .flat_map(|path| {
                read_records(&path)
                    .into_iter()
                    .map(move |record| (path.clone(), record))
            })
            .collect()
    }
}

impl std::ops::Deref for TestArchive {
    type Target = WarcWriter;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl std::ops::DerefMut for TestArchive {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

/// Lists the segment files in `dir`, ordered by serial.
///
/// Files whose names do not parse as segment names sort last, by name.
pub fn list_segments(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| entry.expect("Failed to read directory entry").path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SEGMENT_EXTENSION))
        })
        .collect();
    paths.sort_by_key(|path| {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let serial = SegmentName::parse(&name).map_or(u64::MAX, |n| n.serial);
        (serial, name)
    });
    paths
}

/// Reads every record of a segment, panicking on damage.
pub fn read_records(path: &Path) -> Vec<DecodedRecord> {
    let file = File::open(path).expect("Failed to open segment");
    WarcReader::new(file)
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to decode segment")
}

/// Record types of a segment in file order.
pub fn record_types(path: &Path) -> Vec<String> {
    read_records(path)
        .iter()
        .map(|record| record.record_type().unwrap_or_default().to_string())
        .collect()
}

/// A `GET` exchange captured at [`fixture_time`].
pub fn exchange(uri: &str, body: impl Into<bytes::Bytes>) -> (CapturedResponse, CapturedRequest) {
    let request = CapturedRequest::new("GET", uri)
        .header("Host", "example.com")
        .captured_at(WarcDate::from_datetime(fixture_time()));
    let response = CapturedResponse::new(200, uri)
        .header("Content-Type", "text/html")
        .body(body);
    (response, request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_starts_empty() {
        let archive = TestArchive::new(1_000_000);
        assert!(archive.segment_files().is_empty());
        assert!(archive.current_segment().is_none());
    }

    #[test]
    fn test_exchange_is_written() {
        let mut archive = TestArchive::new(1_000_000);
        let (response, request) = exchange("http://example.com/", "hello");
        archive.record_exchange(&response, &request).unwrap();

        let segments = archive.segment_files();
        assert_eq!(segments.len(), 1);
        assert_eq!(
            record_types(&segments[0]),
            vec!["warcinfo", "response", "request"]
        );
        assert!(segments[0]
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with("-testhost.warc.gz"));
    }

    #[test]
    fn test_list_segments_orders_by_serial() {
        let dir = TempDir::new().unwrap();
        for name in [
            "rec-20240601120000-00010-h.warc.gz",
            "rec-20240601120000-00002-h.warc.gz",
            "notes.txt",
            "rec-20240601115959-00003-h.warc.gz",
        ] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let names: Vec<_> = list_segments(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "rec-20240601120000-00002-h.warc.gz",
                "rec-20240601115959-00003-h.warc.gz",
                "rec-20240601120000-00010-h.warc.gz",
            ]
        );
    }

    #[test]
    fn test_fixture_time() {
        assert_eq!(
            WarcDate::from_datetime(fixture_time()).to_string(),
            "2024-06-01T12:00:00Z"
        );
    }
}
