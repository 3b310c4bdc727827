use async_trait::async_trait;

use super::key_from_env;
use crate::error::Result;
use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
pub struct UrlParam<C> {
    inner: C,
    param_name: String,
    key: String,
}

impl<C> UrlParam<C> {
    pub fn new(inner: C, param_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            inner,
            param_name: param_name.into(),
            key: key.into(),
        }
    }

    /// Reads the key from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdapterError::MissingCredential`] if `var` is unset.
    pub fn from_env(inner: C, param_name: impl Into<String>, var: &str) -> Result<Self> {
        Ok(Self::new(inner, param_name, key_from_env(var)?))
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}
