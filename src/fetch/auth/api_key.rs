use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

use super::key_from_env;
use crate::error::{AdapterError, Result};
use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The header is set last, after the adapter has merged its defaults and the
/// per-call headers, so it replaces any header of the same name.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `key` verbatim in the `header_name` header.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidHeader`] if the name or the key is not
    /// a legal header token.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|e| AdapterError::InvalidHeader(format!("{header_name}: {e}")))?;
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| AdapterError::InvalidHeader(format!("{header_name} value: {e}")))?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// Uses `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, AUTHORIZATION.as_str(), &format!("Bearer {key}"))
    }

    /// Like [`ApiKey::new`], reading the key from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MissingCredential`] if `var` is unset.
    pub fn from_env(inner: C, header_name: &str, var: &str) -> Result<Self> {
        Self::new(inner, header_name, &key_from_env(var)?)
    }

    /// Like [`ApiKey::bearer`], reading the key from the environment variable `var`.
    pub fn bearer_from_env(inner: C, var: &str) -> Result<Self> {
        Self::bearer(inner, &key_from_env(var)?)
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}
