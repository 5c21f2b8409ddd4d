//! Google provider implementation
//!
//! This module provides integration with the Google Generative Language API
//! (Gemini models). The API key travels as a query parameter and the model is
//! part of the URL path, so URLs are built per request.

use async_trait::async_trait;
use parlance_core::{Error, Provider, Request, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;

use crate::google::{
    config::GoogleConfig, converter::GoogleConverter, parser::GoogleParser, stream::GoogleStream,
};
use crate::http::{HttpClient, ReqwestClient};
use crate::traits::{RequestConverter, ResponseParser};

const PROVIDER: &str = "google";

/// Google Gemini provider for chat completions
///
/// # Example
///
/// ```no_run
/// use parlance_providers::Google;
///
/// # fn main() -> Result<(), parlance_core::Error> {
/// let provider = Google::with_api_key("your-api-key")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Google {
    config: GoogleConfig,
    client: Arc<dyn HttpClient>,
    converter: GoogleConverter,
    parser: GoogleParser,
}

impl Google {
    /// Create a new Google provider with the given configuration
    pub fn new(config: GoogleConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::with_client(config, client))
    }

    /// Create a new Google provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::new(GoogleConfig::new(api_key))
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(config: GoogleConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            converter: GoogleConverter,
            parser: GoogleParser,
        }
    }

    fn resolve_model(&self, request: &Request) -> String {
        request
            .model
            .as_ref()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| self.config.default_model.clone())
    }

    fn create_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl Provider for Google {
    type Stream = GoogleStream;

    async fn chat(&self, request: Request) -> Result<Response, Error> {
        let model = self.resolve_model(&request);
        let body = self.converter.convert_request(&request, &model).await?;

        let url = self.config.generate_url(&model);
        let response = self
            .client
            .post(&url, self.create_headers(), body, PROVIDER)
            .await?;

        self.parser.parse_response(response).await
    }

    async fn chat_stream(&self, request: Request) -> Result<Self::Stream, Error> {
        let model = self.resolve_model(&request);
        let body = self.converter.convert_request(&request, &model).await?;

        let url = self.config.stream_url(&model);
        let bytes = self
            .client
            .post_stream(&url, self.create_headers(), body, PROVIDER)
            .await?;

        Ok(GoogleStream::new(bytes))
    }

    fn close(&self) {
        self.client.close();
    }
}
