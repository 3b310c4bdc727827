pub mod adapter;
pub mod blocking;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;

#[cfg(test)]
mod test_support;

pub use adapter::{AdapterResponse, RequestOptions, RestAdapter, Verb};
pub use config::AdapterConfig;
pub use error::{AdapterError, Result};
pub use logging::{LogConfig, LogLevel};
