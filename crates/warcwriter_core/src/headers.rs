//! Rendering of captured HTTP headers into record blocks.

use crate::error::{CoreError, CoreResult};
use crate::exchange::HttpMessage;
use warcwriter_codec::CRLF;

/// Protocol version written on every rendered first line.
///
/// Captures are normalised to HTTP/1.0 regardless of the version actually
/// spoken on the wire.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Renders a message's first line and header fields as CRLF-joined text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFormatter;

impl HeaderFormatter {
    /// Creates a formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Formats `message`.
    ///
    /// Request-like messages start with `<METHOD> <path> HTTP/1.0`,
    /// response-like messages with `HTTP/1.0 <status>`. Each header follows
    /// as `<name>: <value>` in iteration order. There is no trailing CRLF.
    /// A message without a header collection renders as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Format`] if the message has headers but is
    /// neither request-like nor response-like.
    pub fn format<M: HttpMessage + ?Sized>(&self, message: &M) -> CoreResult<String> {
        let Some(headers) = message.headers() else {
            return Ok(String::new());
        };

        let first_line = if let Some(request) = message.as_request() {
            format!("{} {} {HTTP_VERSION}", request.method, request_path(request.uri))
        } else if let Some(response) = message.as_response() {
            format!("{HTTP_VERSION} {}", response.status)
        } else {
            return Err(CoreError::format(
                "message is neither a request nor a response",
            ));
        };

        let mut lines = Vec::with_capacity(headers.len() + 1);
        lines.push(first_line);
        lines.extend(headers.iter().map(|(name, value)| format!("{name}: {value}")));
        Ok(lines.join(CRLF))
    }
}

/// Returns the path component of `uri`.
///
/// Scheme, authority, query and fragment are dropped. An empty path is
/// rendered as `/`.
#[must_use]
pub fn request_path(uri: &str) -> &str {
    let rest = match uri.find("://") {
        Some(i) => {
            let after_scheme = &uri[i + 3..];
            let authority_end = after_scheme
                .find(['/', '?', '#'])
                .unwrap_or(after_scheme.len());
            &after_scheme[authority_end..]
        }
        None => uri,
    };
    let path = rest.find(['?', '#']).map_or(rest, |end| &rest[..end]);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
