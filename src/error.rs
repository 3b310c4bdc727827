//! Error type shared by the adapter, its transport and its configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::adapter::Verb;

/// Everything that can go wrong while configuring or using an adapter.
///
/// Only [`AdapterError::Request`] and [`AdapterError::InvalidUrl`] are
/// produced at call time; the rest come from construction and setup.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The transport failed: DNS, connection refused, TLS, timeout, or a
    /// body that could not be read.
    #[error("{method} {url} failed: {source}")]
    Request {
        method: Verb,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP session: {0}")]
    Session(#[source] reqwest::Error),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("environment variable '{0}' is not set")]
    MissingCredential(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to read '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl AdapterError {
    /// Returns `true` for failures raised by the transport while a request
    /// was in flight.
    pub fn is_transport(&self) -> bool {
        matches!(self, AdapterError::Request { .. })
    }

    /// Returns `true` if the transport gave up because of a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AdapterError::Request { source, .. } if source.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
