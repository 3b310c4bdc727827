//! Adapter configuration.
//!
//! An [`AdapterConfig`] replaces per-API subclassing: the base URL, an
//! optional path suffix (usually an API version) and the default headers are
//! all set here, and credentials are pulled in through header builders that
//! run once when the adapter is constructed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::adapter::options::parse_header;
use crate::error::{AdapterError, Result};
use crate::fetch::SessionOptions;
use crate::logging::LogLevel;

/// Hook run against the default headers at construction time.
pub type HeaderBuilder = Box<dyn Fn(&mut HeaderMap) -> Result<()> + Send + Sync>;

pub struct AdapterConfig {
    pub base_url: String,
    pub path_suffix: Option<String>,
    pub ssl_verify: bool,
    pub default_headers: HeaderMap,
    /// Level for the request and outcome log lines.
    pub log_level: LogLevel,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    header_builders: Vec<HeaderBuilder>,
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("base_url", &self.base_url)
            .field("path_suffix", &self.path_suffix)
            .field("ssl_verify", &self.ssl_verify)
            .field("default_headers", &self.default_headers)
            .field("log_level", &self.log_level)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("header_builders", &self.header_builders.len())
            .finish()
    }
}

impl AdapterConfig {
    /// `base_url` is used verbatim; endpoints are appended to it as strings.
    pub fn new(base_url: impl Into<String>) -> Self {
        let session = SessionOptions::default();
        Self {
            base_url: base_url.into(),
            path_suffix: None,
            ssl_verify: session.ssl_verify,
            default_headers: HeaderMap::new(),
            log_level: LogLevel::default(),
            timeout: session.timeout,
            connect_timeout: session.connect_timeout,
            header_builders: Vec::new(),
        }
    }

    /// Targets `https://{hostname}/`.
    pub fn for_host(hostname: &str) -> Self {
        Self::new(format!("https://{hostname}/"))
    }

    /// Appends `{suffix}/` to the base URL, e.g. an API version.
    pub fn with_path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = Some(suffix.into());
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidHeader`] for an illegal name or value.
    pub fn try_with_header(self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        Ok(self.with_header(name, value))
    }

    /// Merges `headers` into the defaults, replacing names already present.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// Merges the headers stored in a JSON file (see [`HeaderFile`]).
    pub fn with_headers_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let headers = HeaderFile::load(path)?.to_header_map()?;
        Ok(self.with_default_headers(headers))
    }

    /// Registers a hook that may edit the default headers. Hooks run in
    /// registration order when the adapter is built.
    pub fn with_header_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&mut HeaderMap) -> Result<()> + Send + Sync + 'static,
    {
        self.header_builders.push(Box::new(builder));
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Total timeout for every request made by a session built from this
    /// config. Unset by default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            ssl_verify: self.ssl_verify,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        }
    }

    /// Base URL with the path suffix applied.
    pub fn resolved_base_url(&self) -> String {
        let mut url = self.base_url.clone();
        if let Some(suffix) = &self.path_suffix {
            push_path_suffix(&mut url, suffix);
        }
        url
    }

    /// Default headers after every header builder has run.
    pub(crate) fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.default_headers.clone();
        for builder in &self.header_builders {
            builder(&mut headers)?;
        }
        Ok(headers)
    }
}

pub(crate) fn push_path_suffix(url: &mut String, suffix: &str) {
    let suffix = suffix.trim_matches('/');
    if suffix.is_empty() {
        return;
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(suffix);
    url.push('/');
}

/// Header builder that copies the environment variable `var` into `name`.
///
/// The variable is read when the adapter is constructed, not per request.
pub fn header_from_env(
    name: HeaderName,
    var: impl Into<String>,
) -> impl Fn(&mut HeaderMap) -> Result<()> + Send + Sync + 'static {
    let var = var.into();
    move |headers: &mut HeaderMap| {
        let raw =
            std::env::var(&var).map_err(|_| AdapterError::MissingCredential(var.clone()))?;
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|e| AdapterError::InvalidHeader(format!("{name} value from {var}: {e}")))?;
        value.set_sensitive(true);
        headers.insert(name.clone(), value);
        Ok(())
    }
}

/// Default headers stored as a plain JSON object on disk:
/// ```json
/// {
///   "Accept": "application/json",
///   "X-Client": "inventory-sync"
/// }
/// ```
pub struct HeaderFile {
    entries: BTreeMap<String, String>,
}

impl HeaderFile {
    /// Loads the headers from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AdapterError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| AdapterError::ConfigFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in self.iter() {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
