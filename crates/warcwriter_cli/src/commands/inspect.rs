//! Inspect command implementation.

use serde::Serialize;
use std::fs::File;
use std::path::Path;
use warcwriter_codec::{DecodedRecord, WarcReader};
use warcwriter_core::SegmentName;

/// Segment inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Segment path.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Serial parsed from the file name, if it follows the naming scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<u64>,
    /// Records in file order.
    pub records: Vec<RecordSummary>,
    /// Error that stopped reading, typically a truncated last record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Header summary of one record.
#[derive(Debug, Serialize)]
pub struct RecordSummary {
    /// `WARC-Type`.
    pub record_type: Option<String>,
    /// `WARC-Record-ID`.
    pub record_id: Option<String>,
    /// `WARC-Date`.
    pub date: Option<String>,
    /// `WARC-Target-URI`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_uri: Option<String>,
    /// `WARC-Concurrent-To`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent_to: Option<String>,
    /// Block length.
    pub length: usize,
}

impl From<&DecodedRecord> for RecordSummary {
    fn from(record: &DecodedRecord) -> Self {
        Self {
            record_type: record.record_type().map(str::to_string),
            record_id: record.record_id().map(str::to_string),
            date: record.date().map(str::to_string),
            target_uri: record.target_uri().map(str::to_string),
            concurrent_to: record.concurrent_to().map(str::to_string),
            length: record.block.len(),
        }
    }
}

/// Reads every record of `path` into a summary.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut result = InspectResult {
        path: path.display().to_string(),
        size,
        serial: path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(SegmentName::parse)
            .map(|name| name.serial),
        records: Vec::new(),
        error: None,
    };

    for record in WarcReader::new(file) {
        match record {
            Ok(record) => result.records.push(RecordSummary::from(&record)),
            Err(e) => result.error = Some(e.to_string()),
        }
    }

    Ok(result)
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("WARC Segment Inspection");
    println!("=======================");
    println!();
    println!("Path:    {}", result.path);
    println!("Size:    {} bytes", result.size);
    if let Some(serial) = result.serial {
        println!("Serial:  {serial}");
    }
    println!("Records: {}", result.records.len());
    println!();

    for (index, record) in result.records.iter().enumerate() {
        println!(
            "  [{index}] {:<9} {} {} ({} bytes)",
            record.record_type.as_deref().unwrap_or("?"),
            record.record_id.as_deref().unwrap_or("-"),
            record.date.as_deref().unwrap_or("-"),
            record.length
        );
        if let Some(uri) = &record.target_uri {
            println!("        uri: {uri}");
        }
        if let Some(id) = &record.concurrent_to {
            println!("        concurrent-to: {id}");
        }
    }

    if let Some(error) = &result.error {
        println!();
        println!("  ERROR: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warcwriter_core::{CapturedRequest, CapturedResponse, WarcDate, WarcWriter, WriterConfig};

    #[test]
    fn summarises_written_segment() {
        let dir = tempdir().unwrap();
        let mut writer = WarcWriter::open(WriterConfig::new(dir.path(), 1_000_000).host("node")).unwrap();
        let request = CapturedRequest::new("GET", "http://example.com/x").captured_at(WarcDate::now());
        let response = CapturedResponse::new(200, "http://example.com/x").body("body");
        let receipt = writer.record_exchange(&response, &request).unwrap();

        let result = inspect(&receipt.segment).unwrap();
        assert_eq!(result.serial, Some(0));
        assert!(result.error.is_none());

        let types: Vec<_> = result
            .records
            .iter()
            .map(|r| r.record_type.as_deref().unwrap())
            .collect();
        assert_eq!(types, vec!["warcinfo", "response", "request"]);
        assert_eq!(result.records[1].target_uri.as_deref(), Some("http://example.com/x"));
        assert_eq!(
            result.records[2].concurrent_to,
            Some(receipt.response_id.to_string())
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["records"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn reports_truncated_tail() {
        let dir = tempdir().unwrap();
        let mut writer = WarcWriter::open(WriterConfig::new(dir.path(), 1_000_000).host("node")).unwrap();
        let request = CapturedRequest::new("GET", "http://example.com/").captured_at(WarcDate::now());
        let response = CapturedResponse::new(200, "http://example.com/").body("x".repeat(5000));
        let receipt = writer.record_exchange(&response, &request).unwrap();
        drop(writer);

        let data = std::fs::read(&receipt.segment).unwrap();
        std::fs::write(&receipt.segment, &data[..data.len() - 10]).unwrap();

        let result = inspect(&receipt.segment).unwrap();
        assert!(result.error.is_some());
        assert!(result.records.len() >= 2);
        assert_eq!(result.records[0].record_type.as_deref(), Some("warcinfo"));
    }
}
