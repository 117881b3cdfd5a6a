//! Property-based test generators using proptest.
//!
//! Generated exchanges are always well formed: the response has a status
//! and body, and the request has a method and capture date.

use bytes::Bytes;
use chrono::DateTime;
use proptest::prelude::*;
use warcwriter_core::{CapturedRequest, CapturedResponse, Headers, WarcDate};

/// A captured response and the request that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedExchange {
    /// The response half.
    pub response: CapturedResponse,
    /// The request half.
    pub request: CapturedRequest,
}

/// Strategy for generating absolute HTTP(S) URIs, with or without a query.
pub fn uri_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z]{1,12}\\.(com|org|net)",
        prop::collection::vec("[a-z0-9_]{1,8}", 0..4),
        prop::option::of("[a-z]{1,5}=[0-9]{1,3}"),
    )
        .prop_map(|(scheme, host, path, query)| {
            let mut uri = format!("{scheme}://{host}/{}", path.join("/"));
            if let Some(query) = query {
                uri.push('?');
                uri.push_str(&query);
            }
            uri
        })
}

/// Strategy for generating header lists.
pub fn headers_strategy() -> impl Strategy<Value = Headers> {
    prop::collection::vec(
        ("[A-Z][a-z]{1,10}(-[A-Z][a-z]{1,8})?", "[a-zA-Z0-9 ./;=,-]{0,40}"),
        0..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for generating bodies (arbitrary bytes).
pub fn body_strategy(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..max_len).prop_map(Bytes::from)
}

/// Strategy for generating capture dates between 1970 and 2033.
pub fn capture_date_strategy() -> impl Strategy<Value = WarcDate> {
    (0i64..2_000_000_000)
        .prop_filter_map("timestamp out of range", |secs| {
            DateTime::from_timestamp(secs, 0)
        })
        .prop_map(WarcDate::from_datetime)
}

/// Strategy for generating HTTP methods.
pub fn method_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => Just("GET"),
        1 => Just("POST"),
        1 => Just("HEAD"),
    ]
}

/// Strategy for generating HTTP status codes.
pub fn status_strategy() -> impl Strategy<Value = u16> {
    prop::sample::select(vec![200u16, 204, 301, 302, 304, 404, 500, 503])
}

/// Strategy for generating complete exchanges with bodies up to
/// `max_body` bytes.
pub fn exchange_strategy(max_body: usize) -> impl Strategy<Value = GeneratedExchange> {
    (
        uri_strategy(),
        method_strategy(),
        status_strategy(),
        headers_strategy(),
        headers_strategy(),
        body_strategy(max_body),
        body_strategy(64),
        capture_date_strategy(),
    )
        .prop_map(
            |(uri, method, status, request_headers, response_headers, body, request_body, date)| {
                let request = CapturedRequest {
                    method: Some(method.to_string()),
                    uri: uri.clone(),
                    headers: request_headers,
                    body: request_body,
                    capture_date: Some(date),
                };
                let response = CapturedResponse {
                    status: Some(status),
                    uri,
                    headers: response_headers,
                    body: Some(body),
                };
                GeneratedExchange { response, request }
            },
        )
}

/// Strategy for generating a sequence of exchanges.
pub fn exchange_sequence_strategy(
    min_len: usize,
    max_len: usize,
    max_body: usize,
) -> impl Strategy<Value = Vec<GeneratedExchange>> {
    prop::collection::vec(exchange_strategy(max_body), min_len..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 64,
            max_shrink_iters: 500,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    ///
    /// Every case writes real files, so this is what the suites use.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 16,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
