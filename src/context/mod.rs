//! Per-request context handed to route handlers.
//!
//! A [`Context`] carries the request method and path in, the path parameters bound
//! by the router, and the [`Response`] the handler writes out.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;

use crate::http::{Method, Response, StatusCode};

/// Path parameters extracted from the matched route.
///
/// Keys are parameter names without their `:` or `*` prefix.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Params {
    map: HashMap<String, String>,
}

impl Params {
    /// Create a new empty parameters map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, replacing any earlier binding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    /// Get a value from the parameters map
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-request state shared between the router and a handler.
///
/// # Examples
///
/// ```
/// use rttp_router::context::Context;
/// use rttp_router::http::{Method, StatusCode};
///
/// let mut ctx = Context::new(Method::Get, "/hello");
/// ctx.string(StatusCode::Ok, "hi");
///
/// let response = ctx.into_response();
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.body_str(), Some("hi"));
/// ```
#[derive(Debug)]
pub struct Context {
    method: Method,
    path: String,
    params: Params,
    response: Response,
}

impl Context {
    /// Create a context for a request with the given method and path.
    ///
    /// The path is expected without a query string.
    pub fn new(method: impl Into<Method>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: Params::new(),
            response: Response::default(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `self.params().get(key)`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Replace the bound path parameters. Called by the router before the handler runs.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Set the response status without touching headers or body.
    pub fn status(&mut self, status: StatusCode) {
        self.response.set_status(status);
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response.set_header(name, value);
    }

    /// Write a plain-text response.
    pub fn string(&mut self, status: StatusCode, body: impl Into<String>) {
        self.set_header("Content-Type", "text/plain; charset=utf-8");
        self.status(status);
        self.response.set_body(body.into());
    }

    /// Write `value` as a JSON response.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be encoded; the response is left
    /// unchanged in that case.
    pub fn json<T>(&mut self, status: StatusCode, value: &T) -> Result<(), serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(value)?;
        self.set_header("Content-Type", "application/json");
        self.status(status);
        self.response.set_body(body);
        Ok(())
    }

    /// Write raw bytes with the given status.
    pub fn data(&mut self, status: StatusCode, body: impl Into<Bytes>) {
        self.status(status);
        self.response.set_body(body);
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Consume the context, yielding the response written by the handler.
    pub fn into_response(self) -> Response {
        self.response
    }
}
