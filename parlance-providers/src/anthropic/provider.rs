//! Anthropic provider implementation
//!
//! This module provides integration with Anthropic's Messages API, mapping
//! its block-structured requests and responses onto the unified shape.

use async_trait::async_trait;
use parlance_core::{Error, Provider, Request, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;

use crate::anthropic::{
    config::AnthropicConfig, converter::AnthropicConverter, parser::AnthropicParser,
    stream::AnthropicStream,
};
use crate::error;
use crate::http::{HttpClient, ReqwestClient};
use crate::traits::{RequestConverter, ResponseParser};

const PROVIDER: &str = "anthropic";

/// Anthropic Claude provider for chat completions
///
/// # Example
///
/// ```no_run
/// use parlance_providers::Anthropic;
///
/// # fn main() -> Result<(), parlance_core::Error> {
/// let provider = Anthropic::with_api_key("your-api-key")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Anthropic {
    config: AnthropicConfig,
    client: Arc<dyn HttpClient>,
    converter: AnthropicConverter,
    parser: AnthropicParser,
}

impl Anthropic {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: AnthropicConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::with_client(config, client))
    }

    /// Create a new Anthropic provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::new(AnthropicConfig::new(api_key))
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(config: AnthropicConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            converter: AnthropicConverter,
            parser: AnthropicParser,
        }
    }

    fn resolve_model(&self, request: &Request) -> String {
        request
            .model
            .as_ref()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| self.config.default_model.clone())
    }

    /// Anthropic authenticates with `x-api-key`, not a Bearer token
    fn create_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|e| error::response_error(PROVIDER, format!("Invalid API key: {}", e)))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.config.version).map_err(|e| {
                error::response_error(PROVIDER, format!("Invalid API version: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

#[async_trait]
impl Provider for Anthropic {
    type Stream = AnthropicStream;

    async fn chat(&self, request: Request) -> Result<Response, Error> {
        let model = self.resolve_model(&request);
        let body = self.converter.convert_request(&request, &model).await?;

        let headers = self.create_headers()?;
        let response = self
            .client
            .post(&self.config.messages_url(), headers, body, PROVIDER)
            .await?;

        self.parser.parse_response(response).await
    }

    async fn chat_stream(&self, request: Request) -> Result<Self::Stream, Error> {
        let model = self.resolve_model(&request);
        let mut body = self.converter.convert_request(&request, &model).await?;
        body["stream"] = serde_json::json!(true);

        let headers = self.create_headers()?;
        let bytes = self
            .client
            .post_stream(&self.config.messages_url(), headers, body, PROVIDER)
            .await?;

        Ok(AnthropicStream::new(bytes))
    }

    fn close(&self) {
        self.client.close();
    }
}
