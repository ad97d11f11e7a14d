//! Incoming HTTP request type and the typed extractors built on it.

use std::collections::HashMap;
use std::str::FromStr;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::method::Method;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// An incoming HTTP request with its body fully read.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request by hand. The server does this for every inbound
    /// request; tests use it to drive a [`Router`](crate::Router) directly.
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: body.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/user/{id}`, `req.param("id")` on `/user/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a path parameter into `T`, rejecting with `422` when it is
    /// missing or does not parse.
    pub fn param_as<T: FromStr>(&self, key: &str) -> Result<T, Rejection> {
        let raw = self.param(key).ok_or_else(|| Rejection::MissingParam(key.to_owned()))?;
        raw.parse().map_err(|_| Rejection::InvalidParam {
            name: key.to_owned(),
            value: raw.to_owned(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Deserialises the body as JSON, rejecting with `422` on failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Rejection> {
        serde_json::from_slice(&self.body).map_err(|e| Rejection::InvalidBody(e.to_string()))
    }
}

/// Input that failed type coercion before reaching handler logic.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("missing path parameter `{0}`")]
    MissingParam(String),

    #[error("path parameter `{name}`: `{value}` is not a valid {expected}")]
    InvalidParam { name: String, value: String, expected: &'static str },

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        Response::detail(Status::UnprocessableContent, self.to_string())
    }
}
