use async_trait::async_trait;
use reqwest::{Request, Response};

/// The transport seam: sends one fully built request.
///
/// [`Session`](super::Session) is the real implementation; the auth
/// decorators wrap any other implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl HttpClient for Box<dyn HttpClient> {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req).await
    }
}
