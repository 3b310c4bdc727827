use std::fmt;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::{AdapterError, Result};

/// The HTTP methods an adapter dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// Per-call inputs for a dispatched request. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters appended to the target URL, in order.
    pub params: Vec<(String, String)>,
    /// Serialised as the JSON request body.
    pub data: Option<serde_json::Value>,
    /// Headers for this call only. A name set here replaces the adapter's
    /// default header of the same name; other defaults are kept.
    pub headers: HeaderMap,
    /// Overrides the session timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialises `data` into the request body.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Encode`] if `data` cannot be represented as JSON.
    pub fn try_json<T: Serialize + ?Sized>(self, data: &T) -> Result<Self> {
        let value = serde_json::to_value(data).map_err(AdapterError::Encode)?;
        Ok(self.json(value))
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Like [`RequestOptions::header`], validating string input.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidHeader`] for an illegal name or value.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        Ok(self.header(name, value))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| AdapterError::InvalidHeader(format!("{name}: {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| AdapterError::InvalidHeader(format!("{name} value: {e}")))?;
    Ok((header_name, header_value))
}
