mod client;
mod session;
pub mod auth;

pub use client::HttpClient;
pub use session::{Session, SessionOptions};
