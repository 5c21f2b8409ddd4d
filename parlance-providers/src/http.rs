//! HTTP client abstraction and utilities

use crate::error;
use bytes::Bytes;
use futures::Stream;
use parlance_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Type alias for raw response byte streams
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// HTTP client abstraction
///
/// One instance backs one provider; non-success statuses are mapped to the
/// error taxonomy here, before any body parsing happens.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request and parse the JSON response body
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
        provider: &str,
    ) -> Result<Value, Error>;

    /// Send a POST request and return the raw response byte stream
    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
        provider: &str,
    ) -> Result<ByteStream, Error>;

    /// Mark the session closed; subsequent calls fail with `ClientClosed`
    fn close(&self);
}

/// Default HTTP client implementation using reqwest
///
/// The session owns its connection pool, created at construction and shared
/// by all calls. `close()` is idempotent and gates further use; pooled
/// connections are released when the last handle is dropped.
pub struct ReqwestClient {
    client: reqwest::Client,
    closed: AtomicBool,
}

impl ReqwestClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(error::network_error)?;

        Ok(Self {
            client,
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ClientClosed);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
        provider: &str,
    ) -> Result<Value, Error> {
        self.ensure_open()?;
        tracing::debug!(provider, "sending chat request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        let response = check_status(response, provider).await?;
        response.json().await.map_err(error::network_error)
    }

    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
        provider: &str,
    ) -> Result<ByteStream, Error> {
        self.ensure_open()?;
        tracing::debug!(provider, "sending streaming chat request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        let response = check_status(response, provider).await?;
        Ok(Box::pin(response.bytes_stream()))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Map a non-success response to the error taxonomy
async fn check_status(
    response: reqwest::Response,
    provider: &str,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    let body = response.text().await.unwrap_or_default();
    Err(error::status_error(
        provider,
        status.as_u16(),
        retry_after,
        &body,
    ))
}

/// Helper to create common headers for Bearer-authenticated providers
pub fn create_headers(
    provider: &str,
    api_key: &str,
    additional: Option<HeaderMap>,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| error::response_error(provider, format!("Invalid API key: {}", e)))?,
    );

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(additional) = additional {
        headers.extend(additional);
    }

    Ok(headers)
}
