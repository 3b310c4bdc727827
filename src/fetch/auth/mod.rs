//! Credential decorators for [`HttpClient`](super::HttpClient).
//!
//! Each wrapper adds a key to every request before handing it to the inner
//! client, so a session can be shared between authenticated and
//! unauthenticated adapters.

mod api_key;
mod url_param;

pub use api_key::ApiKey;
pub use url_param::UrlParam;

use crate::error::{AdapterError, Result};

pub(crate) fn key_from_env(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| AdapterError::MissingCredential(var.to_string()))
}
