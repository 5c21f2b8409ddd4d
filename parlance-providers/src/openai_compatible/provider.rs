//! Generic client for OpenAI-compatible endpoints
//!
//! Works with any API that follows the chat-completions format, including
//! NVIDIA NIM, OpenRouter and self-hosted models. Reuses the OpenAI wire
//! types and adds the per-deployment extra headers.

use crate::error;
use crate::http::{create_headers, HttpClient, ReqwestClient};
use crate::openai::{ChatCompletionsStream, OpenAIConverter, OpenAIParser};
use crate::openai_compatible::config::OpenAICompatibleConfig;
use crate::traits::{RequestConverter, ResponseParser};
use async_trait::async_trait;
use parlance_core::{Error, Provider, Request, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

const PROVIDER: &str = "openai_compatible";

/// Provider for custom OpenAI-compatible API endpoints
///
/// # Example
///
/// ```no_run
/// use parlance_providers::openai_compatible::{OpenAICompatible, OpenAICompatibleConfig};
///
/// # fn main() -> Result<(), parlance_core::Error> {
/// let config = OpenAICompatibleConfig::new("key", "https://openrouter.ai/api/v1")
///     .with_default_model("meta-llama/llama-3.1-8b-instruct")
///     .with_header("HTTP-Referer", "https://example.com");
/// let provider = OpenAICompatible::new(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenAICompatible {
    config: OpenAICompatibleConfig,
    client: Arc<dyn HttpClient>,
    converter: OpenAIConverter,
    parser: OpenAIParser,
}

impl OpenAICompatible {
    /// Create a new provider with the given configuration
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::with_client(config, client))
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(config: OpenAICompatibleConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            converter: OpenAIConverter,
            parser: OpenAIParser::new(PROVIDER),
        }
    }

    fn resolve_model(&self, request: &Request) -> String {
        request
            .model
            .as_ref()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| self.config.default_model.clone())
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut extra = HeaderMap::new();
        for (name, value) in &self.config.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| error::response_error(PROVIDER, format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| error::response_error(PROVIDER, format!("Invalid header value: {}", e)))?;
            extra.insert(name, value);
        }
        create_headers(PROVIDER, &self.config.api_key, Some(extra))
    }
}

#[async_trait]
impl Provider for OpenAICompatible {
    type Stream = ChatCompletionsStream;

    async fn chat(&self, request: Request) -> Result<Response, Error> {
        let model = self.resolve_model(&request);
        let body = self.converter.convert_request(&request, &model).await?;

        let headers = self.headers()?;
        let response = self
            .client
            .post(&self.config.chat_url(), headers, body, PROVIDER)
            .await?;

        self.parser.parse_response(response).await
    }

    async fn chat_stream(&self, request: Request) -> Result<Self::Stream, Error> {
        let model = self.resolve_model(&request);
        let mut body = self.converter.convert_request(&request, &model).await?;
        body["stream"] = serde_json::json!(true);

        let headers = self.headers()?;
        let bytes = self
            .client
            .post_stream(&self.config.chat_url(), headers, body, PROVIDER)
            .await?;

        Ok(ChatCompletionsStream::new(bytes, PROVIDER))
    }

    fn close(&self) {
        self.client.close();
    }
}
