//! Verify command implementation.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use warcwriter_codec::{names, WarcReader};
use warcwriter_core::{SegmentName, SEGMENT_EXTENSION};

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of segments checked.
    pub segments_checked: usize,
    /// Number of records checked.
    pub records_checked: usize,
    /// Number of requests matched to a response.
    pub linked_pairs: usize,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    /// Returns true if no problem was found.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying segments in {}", dir.display());
    println!();

    let result = verify_dir(dir)?;
    println!(
        "  segments: {}, records: {}, linked pairs: {}",
        result.segments_checked, result.records_checked, result.linked_pairs
    );
    for error in &result.errors {
        println!("    ERROR: {error}");
    }

    println!();
    if result.is_ok() {
        println!("✓ Segment verification passed");
        Ok(())
    } else {
        println!("✗ Segment verification failed");
        Err("Verification failed".into())
    }
}

/// Checks every segment in `dir`.
///
/// - every segment starts with a `warcinfo` record naming the file
/// - every request follows a response in the same segment, linked by
///   `WARC-Concurrent-To` and carrying the same `WARC-Date`
/// - no record ID repeats across segments
/// - no serial repeats for the same prefix and host
pub fn verify_dir(dir: &Path) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut segments: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SEGMENT_EXTENSION))
        })
        .collect();
    segments.sort();

    let mut result = VerifyResult::default();
    let mut seen_ids = HashSet::new();
    let mut serials: HashMap<(String, String), HashSet<u64>> = HashMap::new();

    for path in &segments {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        if let Some(name) = SegmentName::parse(&file_name) {
            let taken = serials.entry((name.prefix, name.host)).or_default();
            if !taken.insert(name.serial) {
                result
                    .errors
                    .push(format!("{file_name}: serial {} used twice", name.serial));
            }
        }

        verify_segment(path, &file_name, &mut seen_ids, &mut result)?;
        result.segments_checked += 1;
    }

    Ok(result)
}

fn verify_segment(
    path: &Path,
    file_name: &str,
    seen_ids: &mut HashSet<String>,
    result: &mut VerifyResult,
) -> Result<(), Box<dyn std::error::Error>> {
    // Response ID -> WARC-Date, for responses seen in this segment.
    let mut responses: HashMap<String, String> = HashMap::new();

    for (index, record) in WarcReader::new(File::open(path)?).enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                result.errors.push(format!("{file_name}: record {index}: {e}"));
                break;
            }
        };
        result.records_checked += 1;

        let record_type = record.record_type().unwrap_or_default();
        let id = record.record_id().unwrap_or_default().to_string();
        let date = record.date().unwrap_or_default().to_string();

        if id.is_empty() {
            result
                .errors
                .push(format!("{file_name}: record {index}: missing record ID"));
        } else if !seen_ids.insert(id.clone()) {
            result.errors.push(format!("{file_name}: duplicate record ID {id}"));
        }

        if index == 0 {
            if record_type != "warcinfo" {
                result.errors.push(format!(
                    "{file_name}: first record is {record_type:?}, expected warcinfo"
                ));
            } else if record.fields.get(names::WARC_FILENAME) != Some(file_name) {
                result
                    .errors
                    .push(format!("{file_name}: warcinfo names a different file"));
            }
        }

        match record_type {
            "response" => {
                responses.insert(id, date);
            }
            "request" => {
                let Some(target) = record.concurrent_to() else {
                    result
                        .errors
                        .push(format!("{file_name}: request {id} has no WARC-Concurrent-To"));
                    continue;
                };
                match responses.get(target) {
                    Some(response_date) if *response_date == date => result.linked_pairs += 1,
                    Some(response_date) => result.errors.push(format!(
                        "{file_name}: request {id} dated {date}, response dated {response_date}"
                    )),
                    None => result.errors.push(format!(
                        "{file_name}: request {id} points at {target}, not a response in this segment"
                    )),
                }
            }
            _ => {}
        }
    }

    Ok(())
}
