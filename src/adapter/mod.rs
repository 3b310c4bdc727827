//! The REST adapter: one session, one base URL, default headers, and a
//! logged dispatch routine behind four verb methods.

pub mod options;
mod response;

pub use options::{RequestOptions, Verb};
pub use response::AdapterResponse;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Request, Url};
use tracing::error;

use crate::config::{AdapterConfig, push_path_suffix};
use crate::error::{AdapterError, Result};
use crate::fetch::{HttpClient, Session};
use crate::logging::{LogLevel, event_at};

/// Client for a single API target.
///
/// Build one per API and keep it: every call goes through the same session,
/// so pooled connections are reused. API-specific clients wrap an adapter
/// and configure it through [`AdapterConfig`] rather than extending it.
pub struct RestAdapter<C = Session> {
    base_url: String,
    session: C,
    default_headers: HeaderMap,
    ssl_verify: bool,
    log_level: LogLevel,
}

impl RestAdapter<Session> {
    /// Builds a [`Session`] from `config` and wraps it. No network I/O.
    ///
    /// # Errors
    ///
    /// Fails if the session cannot be built or a header builder fails.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let session = Session::from_options(&config.session_options())?;
        Self::with_client(config, session)
    }
}

impl<C: HttpClient> RestAdapter<C> {
    /// Uses `client` as the session, e.g. a [`Session`] wrapped in
    /// [`ApiKey`](crate::fetch::auth::ApiKey). The TLS and timeout settings
    /// in `config` only apply to sessions built by [`RestAdapter::new`].
    pub fn with_client(config: AdapterConfig, client: C) -> Result<Self> {
        let default_headers = config.build_headers()?;
        let adapter = Self {
            base_url: config.resolved_base_url(),
            session: client,
            default_headers,
            ssl_verify: config.ssl_verify,
            log_level: config.log_level,
        };
        event_at!(
            adapter.log_level,
            base_url = %adapter.base_url,
            ssl_verify = adapter.ssl_verify,
            default_headers = adapter.default_headers.len(),
            "REST adapter ready"
        );
        Ok(adapter)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `{suffix}/` to the base URL of an existing adapter.
    pub fn append_path_suffix(&mut self, suffix: &str) {
        push_path_suffix(&mut self.base_url, suffix);
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Headers sent with every request. Changes apply to later calls.
    pub fn default_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.default_headers
    }

    pub fn session(&self) -> &C {
        &self.session
    }

    pub fn ssl_verify(&self) -> bool {
        self.ssl_verify
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Writes `msg` at `level`.
    pub fn log(&self, level: LogLevel, msg: &str) {
        event_at!(level, "{msg}");
    }

    /// Sends `verb` to `base_url + endpoint` through the session.
    ///
    /// Logs the outgoing request and its outcome. Non-2xx statuses are
    /// returned as responses and logged at ERROR.
    ///
    /// # Errors
    ///
    /// [`AdapterError::InvalidUrl`] if the joined URL does not parse, and
    /// [`AdapterError::Request`] for any transport failure. Both are logged
    /// before being returned.
    pub async fn dispatch(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<AdapterResponse> {
        let full_url = format!("{}{}", self.base_url, endpoint);
        let log_params: Vec<String> = options
            .params
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        event_at!(
            self.log_level,
            method = %verb,
            url = %full_url,
            params = ?log_params,
            "Dispatching request"
        );

        let request = self
            .build_request(verb, &full_url, options)
            .inspect_err(|e| {
                error!(method = %verb, url = %full_url, error = %e, "Request could not be built");
            })?;

        let response = self.session.execute(request).await.map_err(|source| {
            error!(method = %verb, url = %full_url, error = %source, "Request failed");
            AdapterError::Request {
                method: verb,
                url: full_url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.bytes().await.map_err(|source| {
            error!(
                method = %verb,
                url = %full_url,
                status_code = status.as_u16(),
                error = %source,
                "Failed to read response body"
            );
            AdapterError::Request {
                method: verb,
                url: full_url.clone(),
                source,
            }
        })?;

        let result = AdapterResponse::new(status, headers, final_url, body);
        let success = result.is_success();
        if success {
            event_at!(
                self.log_level,
                method = %verb,
                url = %full_url,
                params = ?log_params,
                success,
                status_code = status.as_u16(),
                reason = result.reason(),
                "Request completed"
            );
        } else {
            error!(
                method = %verb,
                url = %full_url,
                params = ?log_params,
                success,
                status_code = status.as_u16(),
                reason = result.reason(),
                "Request completed"
            );
        }
        Ok(result)
    }

    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Get, endpoint, options).await
    }

    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Post, endpoint, options).await
    }

    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Put, endpoint, options).await
    }

    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Delete, endpoint, options).await
    }

    fn build_request(&self, verb: Verb, full_url: &str, options: RequestOptions) -> Result<Request> {
        let mut url = Url::parse(full_url).map_err(|source| AdapterError::InvalidUrl {
            url: full_url.to_string(),
            source,
        })?;
        if !options.params.is_empty() {
            url.query_pairs_mut().extend_pairs(options.params.iter());
        }

        let mut request = Request::new(verb.into(), url);

        // Extending with a HeaderMap replaces names already present, so
        // per-call headers win over defaults.
        let headers = request.headers_mut();
        headers.extend(self.default_headers.clone());
        headers.extend(options.headers);

        if let Some(data) = options.data {
            let body = serde_json::to_vec(&data).map_err(AdapterError::Encode)?;
            request
                .headers_mut()
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(body.into());
        }
        if let Some(timeout) = options.timeout {
            *request.timeout_mut() = Some(timeout);
        }
        Ok(request)
    }
}
