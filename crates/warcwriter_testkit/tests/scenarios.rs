//! End-to-end scenarios for the writer facade.

use std::sync::Arc;
use warcwriter_core::{
    CapturedResponse, CoreError, Segment, SegmentName, UuidGenerator, WarcWriter, WriterConfig,
};
use warcwriter_storage::{FileBackend, StorageBackend};
use warcwriter_testkit::prelude::*;

#[test]
fn first_exchange_opens_one_segment() {
    let mut archive = TestArchive::new(1_000);
    let (response, request) = exchange("http://example.com/", "tiny");

    let receipt = archive.record_exchange(&response, &request).unwrap();

    assert!(receipt.rotated);
    let segments = archive.segment_files();
    assert_eq!(segments, vec![receipt.segment.clone()]);
    assert_eq!(
        segments[0].file_name().unwrap().to_str(),
        Some("rec-20240601120000-00000-testhost.warc.gz")
    );
    assert_eq!(
        record_types(&segments[0]),
        vec!["warcinfo", "response", "request"]
    );

    let stats = archive.stats();
    assert_eq!(stats.exchanges, 1);
    assert_eq!(stats.records, 3);
    assert_eq!(stats.segments_opened, 1);
    assert_eq!(
        stats.bytes_written,
        std::fs::metadata(&segments[0]).unwrap().len()
    );
}

#[test]
fn near_full_segment_rotates() {
    let mut archive = TestArchive::new(1_000);

    // Serial 0 already holds 900 bytes.
    let existing = archive
        .path()
        .join("rec-20240601115900-00000-testhost.warc.gz");
    let mut backend = FileBackend::create_new(&existing).unwrap();
    backend.append(&[0u8; 900]).unwrap();
    backend.flush().unwrap();
    archive.adopt_segment(Segment::new(existing.clone(), 0, Box::new(backend)));

    // Block lengths of both records come to well over 100 bytes.
    let (response, request) = exchange("http://example.com/page", "z".repeat(120));
    let receipt = archive.record_exchange(&response, &request).unwrap();

    assert!(receipt.rotated);
    assert_ne!(receipt.segment, existing);
    assert_eq!(std::fs::metadata(&existing).unwrap().len(), 900);

    let name = SegmentName::parse(receipt.segment.file_name().unwrap().to_str().unwrap()).unwrap();
    assert_eq!(name.serial, 1);
    assert_eq!(
        record_types(&receipt.segment),
        vec!["warcinfo", "response", "request"]
    );
    assert_eq!(archive.segment_files(), vec![existing, receipt.segment]);
}

#[test]
fn response_without_status_is_rejected() {
    let mut archive = TestArchive::new(1_000);
    let (_, request) = exchange("http://example.com/", "");
    let response = CapturedResponse {
        status: None,
        uri: "http://example.com/".to_string(),
        body: Some("body".into()),
        ..CapturedResponse::default()
    };

    let err = archive.record_exchange(&response, &request).unwrap_err();

    assert!(matches!(err, CoreError::MalformedRecord { .. }));
    assert!(archive.segment_files().is_empty());
    assert_eq!(std::fs::read_dir(archive.path()).unwrap().count(), 0);
    assert!(!archive.is_halted());
    assert_eq!(archive.stats().rejected, 1);

    // The writer carries on with the next exchange.
    let (response, request) = exchange("http://example.com/next", "ok");
    archive.record_exchange(&response, &request).unwrap();
    assert_eq!(archive.segment_files().len(), 1);
}

#[test]
fn broken_request_uri_leaves_no_lone_response() {
    let mut archive = TestArchive::new(1_000_000);
    let (response, request) = exchange("http://example.com/ok", "fine");
    let first = archive.record_exchange(&response, &request).unwrap();
    let before = std::fs::read(&first.segment).unwrap();

    let (response, mut request) = exchange("http://example.com/ok", "body");
    request.uri = "http://example.com/a\r\nb".to_string();
    let err = archive.record_exchange(&response, &request).unwrap_err();

    assert!(matches!(err, CoreError::MalformedRecord { .. }));
    assert!(err.is_rejection());
    assert_eq!(std::fs::read(&first.segment).unwrap(), before);
    assert_eq!(
        record_types(&first.segment),
        vec!["warcinfo", "response", "request"]
    );
    assert_eq!(archive.segment_files(), vec![first.segment]);
}

#[test]
fn request_without_capture_date_is_rejected() {
    let mut archive = TestArchive::new(1_000);
    let (response, mut request) = exchange("http://example.com/", "body");
    request.capture_date = None;

    let err = archive.record_exchange(&response, &request).unwrap_err();

    assert!(matches!(err, CoreError::MissingTimestamp { .. }));
    assert!(archive.segment_files().is_empty());
}

#[test]
fn missing_output_directory_fails() {
    let config = WriterConfig::new("/nonexistent/warcwriter-archive", 1_000).host(TEST_HOST);
    let mut writer = WarcWriter::open(config).unwrap();
    let (response, request) = exchange("http://example.com/", "body");

    let err = writer.record_exchange(&response, &request).unwrap_err();

    assert!(matches!(err, CoreError::DestinationMissing { .. }));
    assert!(err.is_fatal());
    assert!(writer.current_segment().is_none());
    assert!(!writer.is_halted());
}

#[test]
fn exhausted_serials_halt_the_writer() {
    let mut archive = TestArchive::with_config(100, |config| config.serial_width(1));
    for i in 0..10 {
        let (response, request) = exchange(&format!("http://example.com/{i}"), "w".repeat(200));
        archive.record_exchange(&response, &request).unwrap();
    }
    assert_eq!(archive.segment_files().len(), 10);

    let (response, request) = exchange("http://example.com/overflow", "w");
    let err = archive.record_exchange(&response, &request).unwrap_err();
    assert!(matches!(err, CoreError::SerialOverflow { serial: 10, max: 9 }));
    assert!(archive.is_halted());

    let err = archive.record_exchange(&response, &request).unwrap_err();
    assert!(matches!(err, CoreError::WriterHalted { .. }));
    assert_eq!(archive.segment_files().len(), 10);
}

#[test]
fn removed_segment_is_replaced() {
    let mut archive = TestArchive::new(1_000_000);
    let (response, request) = exchange("http://example.com/", "body");
    let first = archive.record_exchange(&response, &request).unwrap();

    std::fs::remove_file(&first.segment).unwrap();
    let second = archive.record_exchange(&response, &request).unwrap();

    assert!(second.rotated);
    assert_ne!(second.segment, first.segment);
    assert_eq!(
        record_types(&second.segment),
        vec!["warcinfo", "response", "request"]
    );
}

#[test]
fn compression_level_zero_still_reads_back() {
    let mut archive = TestArchive::with_config(1_000_000, |config| config.compression_level(0));
    let (response, request) = exchange("http://example.com/", "stored, not deflated");
    let receipt = archive.record_exchange(&response, &request).unwrap();

    let records = read_records(&receipt.segment);
    assert_eq!(records.len(), 3);
    assert!(records[1].block.ends_with(b"stored, not deflated"));
}

#[test]
fn writers_can_share_a_directory_by_host() {
    let dir = tempfile::tempdir().unwrap();
    let open = |host: &str| {
        WarcWriter::with_parts(
            WriterConfig::new(dir.path(), 1_000_000).host(host),
            Arc::new(UuidGenerator),
            Arc::new(warcwriter_core::FixedClock::new(fixture_time())),
        )
        .unwrap()
    };
    let mut alpha = open("alpha");
    let mut beta = open("beta");

    let (response, request) = exchange("http://example.com/", "body");
    let a = alpha.record_exchange(&response, &request).unwrap();
    let b = beta.record_exchange(&response, &request).unwrap();

    assert_ne!(a.segment, b.segment);
    assert_eq!(list_segments(dir.path()).len(), 2);
}
