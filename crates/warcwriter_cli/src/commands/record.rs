//! Record command implementation.
//!
//! Each input line is one JSON object:
//!
//! ```json
//! {"request":  {"method": "GET", "uri": "http://example.com/", "headers": [["Host", "example.com"]],
//!               "capture_date": "2024-06-01T12:00:00Z"},
//!  "response": {"status": 200, "uri": "http://example.com/", "headers": [], "body": "<html/>"}}
//! ```
//!
//! Lines without a `capture_date` are stamped with the current time.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;
use warcwriter_core::{
    CapturedRequest, CapturedResponse, CoreError, Headers, WarcDate, WarcWriter, WriterConfig,
};

/// A request as it appears in the input file.
#[derive(Debug, Deserialize)]
pub struct RequestInput {
    /// HTTP method.
    pub method: Option<String>,
    /// Target URI.
    pub uri: String,
    /// Header fields in order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Request body.
    #[serde(default)]
    pub body: String,
    /// Capture timestamp.
    pub capture_date: Option<String>,
}

/// A response as it appears in the input file.
#[derive(Debug, Deserialize)]
pub struct ResponseInput {
    /// HTTP status.
    pub status: Option<u16>,
    /// URI the response belongs to.
    pub uri: String,
    /// Header fields in order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Option<String>,
}

/// One input line.
#[derive(Debug, Deserialize)]
pub struct ExchangeInput {
    /// The captured request.
    pub request: RequestInput,
    /// The captured response.
    pub response: ResponseInput,
}

impl ExchangeInput {
    /// Converts the line into the writer's exchange types.
    ///
    /// A missing capture date is filled in with `now`.
    pub fn into_exchange(
        self,
        now: WarcDate,
    ) -> Result<(CapturedResponse, CapturedRequest), CoreError> {
        let capture_date = match self.request.capture_date {
            Some(text) => WarcDate::parse(&text)?,
            None => now,
        };

        let request = CapturedRequest {
            method: self.request.method,
            uri: self.request.uri,
            headers: self.request.headers.into_iter().collect::<Headers>(),
            body: self.request.body.into(),
            capture_date: Some(capture_date),
        };
        let response = CapturedResponse {
            status: self.response.status,
            uri: self.response.uri,
            headers: self.response.headers.into_iter().collect::<Headers>(),
            body: self.response.body.map(Into::into),
        };
        Ok((response, request))
    }
}

/// Runs the record command.
pub fn run(input: &Path, config: WriterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = WarcWriter::open(config)?;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        let parsed: ExchangeInput = serde_json::from_str(&line)
            .map_err(|e| format!("line {line_no}: invalid exchange: {e}"))?;
        let (response, request) = match parsed.into_exchange(WarcDate::now()) {
            Ok(exchange) => exchange,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping exchange");
                continue;
            }
        };

        match writer.record_exchange(&response, &request) {
            Ok(_) => {}
            // Already logged by the writer.
            Err(e) if e.is_rejection() => {}
            Err(e) => return Err(format!("line {line_no}: {e}").into()),
        }
    }

    let stats = writer.stats();
    println!("Exchanges written: {}", stats.exchanges);
    println!("Exchanges skipped: {}", stats.rejected);
    println!("Records written:   {}", stats.records);
    println!("Segments opened:   {}", stats.segments_opened);
    println!("Bytes written:     {}", stats.bytes_written);
    if let Some(path) = writer.current_segment() {
        println!("Current segment:   {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ExchangeInput {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn full_line_converts() {
        let input = parse(
            r#"{"request": {"method": "GET", "uri": "http://example.com/", "headers": [["Host", "example.com"], ["Accept", "*/*"]], "capture_date": "2024-06-01T12:00:00Z"},
                "response": {"status": 200, "uri": "http://example.com/", "body": "hi"}}"#,
        );
        let (response, request) = input.into_exchange(WarcDate::now()).unwrap();

        assert_eq!(request.method.as_deref(), Some("GET"));
        assert_eq!(request.headers.len(), 2);
        assert_eq!(
            request.capture_date.unwrap().to_string(),
            "2024-06-01T12:00:00Z"
        );
        assert_eq!(response.status, Some(200));
        assert_eq!(response.body.as_deref(), Some(&b"hi"[..]));
    }

    #[test]
    fn missing_date_is_stamped() {
        let input = parse(
            r#"{"request": {"method": "GET", "uri": "http://a/"}, "response": {"status": 204, "uri": "http://a/", "body": ""}}"#,
        );
        let now: WarcDate = "2024-01-01T00:00:00Z".parse().unwrap();
        let (_, request) = input.into_exchange(now).unwrap();
        assert_eq!(request.capture_date, Some(now));
    }

    #[test]
    fn missing_fields_stay_missing() {
        let input = parse(r#"{"request": {"uri": "http://a/"}, "response": {"uri": "http://a/"}}"#);
        let (response, request) = input.into_exchange(WarcDate::now()).unwrap();
        assert!(request.method.is_none());
        assert!(response.status.is_none());
        assert!(response.body.is_none());
    }

    #[test]
    fn bad_date_is_rejected() {
        let input = parse(
            r#"{"request": {"method": "GET", "uri": "http://a/", "capture_date": "soon"}, "response": {"status": 200, "uri": "http://a/", "body": ""}}"#,
        );
        let err = input.into_exchange(WarcDate::now()).unwrap_err();
        assert!(err.is_rejection());
    }
}
