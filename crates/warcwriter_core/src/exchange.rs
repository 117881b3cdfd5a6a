//! Captured HTTP exchanges as handed over by the crawl engine.
//!
//! The writer only reads these. Fields the engine may fail to provide are
//! optional so that validation can reject an incomplete exchange before any
//! byte reaches disk.

use crate::types::WarcDate;
use bytes::Bytes;

/// Ordered HTTP header fields.
///
/// Iteration follows insertion order and repeated names are kept, so a
/// captured message is rendered exactly as it was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping any earlier field with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// The request line of a request-like message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLine<'a> {
    /// HTTP method.
    pub method: &'a str,
    /// Full target URI.
    pub uri: &'a str,
}

/// The status line of a response-like message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    /// HTTP status code.
    pub status: u16,
}

/// Capabilities a captured message exposes to the header formatter.
///
/// A message is request-like if [`HttpMessage::as_request`] returns a line
/// and response-like if [`HttpMessage::as_response`] does. A message that
/// is neither but still has headers cannot be formatted.
pub trait HttpMessage {
    /// The header collection, if the message has one.
    fn headers(&self) -> Option<&Headers>;

    /// The request line, if the message is request-like.
    fn as_request(&self) -> Option<RequestLine<'_>> {
        None
    }

    /// The status line, if the message is response-like.
    fn as_response(&self) -> Option<StatusLine> {
        None
    }
}

/// A captured HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedRequest {
    /// HTTP method; `None` if the engine did not record one.
    pub method: Option<String>,
    /// Target URI.
    pub uri: String,
    /// Request headers.
    pub headers: Headers,
    /// Request body, often empty.
    pub body: Bytes,
    /// Capture timestamp shared with the paired response.
    pub capture_date: Option<WarcDate>,
}

impl CapturedRequest {
    /// Creates a request with the given method and URI.
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Stamps the shared capture timestamp.
    #[must_use]
    pub fn captured_at(mut self, date: WarcDate) -> Self {
        self.capture_date = Some(date);
        self
    }
}

impl HttpMessage for CapturedRequest {
    fn headers(&self) -> Option<&Headers> {
        Some(&self.headers)
    }

    fn as_request(&self) -> Option<RequestLine<'_>> {
        self.method.as_deref().map(|method| RequestLine {
            method,
            uri: &self.uri,
        })
    }
}

/// A captured HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedResponse {
    /// HTTP status code; `None` if the engine did not record one.
    pub status: Option<u16>,
    /// URI the response was received for.
    pub uri: String,
    /// Response headers.
    pub headers: Headers,
    /// Response body; `None` if the engine did not keep one.
    pub body: Option<Bytes>,
}

impl CapturedResponse {
    /// Creates a response with the given status, URI and an empty body.
    #[must_use]
    pub fn new(status: u16, uri: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            uri: uri.into(),
            headers: Headers::new(),
            body: Some(Bytes::new()),
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl HttpMessage for CapturedResponse {
    fn headers(&self) -> Option<&Headers> {
        Some(&self.headers)
    }

    fn as_response(&self) -> Option<StatusLine> {
        self.status.map(|status| StatusLine { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_keep_order_and_duplicates() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("Content-Type", "text/html");
        headers.append("Set-Cookie", "b=2");

        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Set-Cookie", "Content-Type", "Set-Cookie"]);
        assert_eq!(headers.get("set-cookie"), Some("a=1"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn request_capabilities() {
        let request = CapturedRequest::new("GET", "http://example.com/a");
        let line = request.as_request().unwrap();
        assert_eq!(line.method, "GET");
        assert_eq!(line.uri, "http://example.com/a");
        assert!(request.as_response().is_none());

        let no_method = CapturedRequest {
            method: None,
            ..request
        };
        assert!(no_method.as_request().is_none());
    }

    #[test]
    fn response_capabilities() {
        let response = CapturedResponse::new(404, "http://example.com/").body("gone");
        assert_eq!(response.as_response(), Some(StatusLine { status: 404 }));
        assert!(response.as_request().is_none());
        assert_eq!(response.body.as_deref(), Some(&b"gone"[..]));
    }

    #[test]
    fn builders_set_fields() {
        let date: WarcDate = "2024-01-02T03:04:05Z".parse().unwrap();
        let request = CapturedRequest::new("POST", "http://example.com/form")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("q=1")
            .captured_at(date);

        assert_eq!(request.capture_date, Some(date));
        assert_eq!(&request.body[..], b"q=1");
        assert_eq!(
            request.headers.get("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }
}
