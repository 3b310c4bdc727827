//! Test doubles shared by the unit tests.

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response, Url};
use tracing_subscriber::fmt::MakeWriter;

use crate::fetch::HttpClient;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

/// Records every request and answers with a fixed status and body.
#[derive(Clone)]
pub struct RecordingClient {
    log: Arc<Mutex<Vec<RecordedRequest>>>,
    status: u16,
    body: &'static str,
}

impl RecordingClient {
    pub fn new(status: u16, body: &'static str) -> Self {
        Self {
            log: Arc::default(),
            status,
            body,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.log.lock().unwrap().last().cloned()
    }

    /// `true` if both handles are clones of the same client.
    pub fn shares_log_with(&self, other: &RecordingClient) -> bool {
        Arc::ptr_eq(&self.log, &other.log)
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.log.lock().unwrap().push(RecordedRequest {
            method: req.method().clone(),
            url: req.url().clone(),
            headers: req.headers().clone(),
            body: req.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
            timeout: req.timeout().copied(),
        });
        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body)
            .unwrap();
        Ok(Response::from(resp))
    }
}

/// In-memory writer for formatted log output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn subscriber(logs: CapturedLogs) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(logs)
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish()
}

/// Runs `f` with a thread-local subscriber and returns what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    tracing::subscriber::with_default(subscriber(logs.clone()), f);
    logs.contents()
}

/// Awaits `fut` with a thread-local subscriber. Only valid on a
/// current-thread runtime, which is what `#[tokio::test]` uses.
pub async fn capture_logs_async<F: Future>(fut: F) -> (F::Output, String) {
    let logs = CapturedLogs::default();
    let guard = tracing::subscriber::set_default(subscriber(logs.clone()));
    let output = fut.await;
    drop(guard);
    (output, logs.contents())
}
