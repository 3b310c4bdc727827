use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::client::HttpClient;
use crate::error::{AdapterError, Result};

/// Transport-level settings applied once when the session is built.
///
/// No timeout is set unless asked for: a request waits for the server for
/// as long as the transport allows.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// When `false`, invalid and self-signed certificates are accepted.
    pub ssl_verify: bool,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ssl_verify: true,
            timeout: None,
            connect_timeout: None,
        }
    }
}

/// A reusable reqwest client. Connections are pooled inside it, so one
/// session should live as long as the adapter that owns it.
#[derive(Debug, Clone)]
pub struct Session(reqwest::Client);

impl Session {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }

    /// Builds a session from `options`. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Session`] if the TLS backend cannot be
    /// initialised.
    pub fn from_options(options: &SessionOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = options.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if !options.ssl_verify {
            debug!("TLS certificate verification disabled for session");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(AdapterError::Session)?;
        Ok(Self(client))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.0
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for Session {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
