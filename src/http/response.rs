//! In-memory HTTP response written by handlers.
//!
//! A [`Response`] is never serialized here; it is the value a transport layer
//! reads back out of a [`Context`](crate::context::Context) after dispatch.

use bytes::Bytes;

use super::StatusCode;

/// An HTTP response under construction.
///
/// Handlers write to it through the [`Context`](crate::context::Context) helpers;
/// the builder methods below are convenient when composing one directly.
///
/// # Examples
///
/// ```
/// use rttp_router::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(r#"{"status":"ok"}"#);
///
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.header_value("content-type"), Some("application/json"));
/// assert_eq!(response.body_str(), Some(r#"{"status":"ok"}"#));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// Creates a new response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Sets a header, replacing any existing value with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Bytes::from(body.into());
        self
    }

    /// Sets the status in-place.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Sets a header in-place. Header names compare case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Replaces the body in-place.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the value of the named header (case-insensitive), if set.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns all headers in the order they were first set.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the raw body bytes.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text, or `None` if it is not valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_ok() {
        let r = Response::default();
        assert_eq!(r.status(), StatusCode::Ok);
        assert!(r.body_bytes().is_empty());
        assert_eq!(r.headers().count(), 0);
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut r = Response::new(StatusCode::Ok);
        r.set_header("Content-Type", "text/plain");
        r.set_header("content-type", "application/json");
        assert_eq!(r.headers().count(), 1);
        assert_eq!(r.header_value("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn body_str_rejects_invalid_utf8() {
        let mut r = Response::new(StatusCode::Ok);
        r.set_body(vec![0xff, 0xfe]);
        assert_eq!(r.body_str(), None);
        assert_eq!(r.body_bytes().len(), 2);
    }
}
