//! A blocking [`RestAdapter`].
//!
//! Each call blocks the calling thread until the transport answers or
//! fails. The async adapter is driven on a current-thread runtime owned by
//! this type, so the pooled connections live as long as the adapter does.
//!
//! Like `reqwest::blocking`, this must not be used from within an async
//! runtime: calling it inside one panics.

use tokio::runtime::{Builder, Runtime};

use crate::adapter::{self, AdapterResponse, RequestOptions, Verb};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::fetch::{HttpClient, Session};
use crate::logging::LogLevel;

pub struct RestAdapter<C = Session> {
    inner: adapter::RestAdapter<C>,
    runtime: Runtime,
}

impl RestAdapter<Session> {
    /// # Errors
    ///
    /// Fails like [`adapter::RestAdapter::new`], or if the runtime cannot start.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        Self::from_async(adapter::RestAdapter::new(config)?)
    }
}

impl<C: HttpClient> RestAdapter<C> {
    pub fn with_client(config: AdapterConfig, client: C) -> Result<Self> {
        Self::from_async(adapter::RestAdapter::with_client(config, client)?)
    }

    pub fn from_async(inner: adapter::RestAdapter<C>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AdapterError::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn inner(&self) -> &adapter::RestAdapter<C> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut adapter::RestAdapter<C> {
        &mut self.inner
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn log(&self, level: LogLevel, msg: &str) {
        self.inner.log(level, msg);
    }

    pub fn dispatch(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<AdapterResponse> {
        self.runtime
            .block_on(self.inner.dispatch(verb, endpoint, options))
    }

    pub fn get(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Get, endpoint, options)
    }

    pub fn post(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Post, endpoint, options)
    }

    pub fn put(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Put, endpoint, options)
    }

    pub fn delete(&self, endpoint: &str, options: RequestOptions) -> Result<AdapterResponse> {
        self.dispatch(Verb::Delete, endpoint, options)
    }
}
