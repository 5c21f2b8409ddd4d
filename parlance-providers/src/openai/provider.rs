//! OpenAI provider implementation
//!
//! This module provides integration with OpenAI's chat completions API,
//! supporting blocking and streaming responses with tool calling. It
//! implements the core `Provider` trait via the shared request/response
//! conversion pipeline.

use crate::http::{create_headers, HttpClient, ReqwestClient};
use crate::openai::{
    config::OpenAIConfig, converter::OpenAIConverter, parser::OpenAIParser,
    stream::ChatCompletionsStream,
};
use crate::traits::{RequestConverter, ResponseParser};
use async_trait::async_trait;
use parlance_core::{Error, Provider, Request, Response};
use std::sync::Arc;

const PROVIDER: &str = "openai";

/// OpenAI provider for chat completions
///
/// # Example
///
/// ```no_run
/// use parlance_providers::OpenAI;
///
/// # fn main() -> Result<(), parlance_core::Error> {
/// let provider = OpenAI::with_api_key("your-api-key")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenAI {
    config: OpenAIConfig,
    client: Arc<dyn HttpClient>,
    converter: OpenAIConverter,
    parser: OpenAIParser,
}

impl OpenAI {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: OpenAIConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::with_client(config, client))
    }

    /// Create a new OpenAI provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::new(OpenAIConfig::new(api_key))
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(config: OpenAIConfig, client: Arc<dyn HttpClient>) -> Self {
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
}

#[async_trait]
impl Provider for OpenAI {
    type Stream = ChatCompletionsStream;

    async fn chat(&self, request: Request) -> Result<Response, Error> {
        let model = self.resolve_model(&request);
        let body = self.converter.convert_request(&request, &model).await?;

        let headers = create_headers(PROVIDER, &self.config.api_key, None)?;
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

        let headers = create_headers(PROVIDER, &self.config.api_key, None)?;
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
