//! Mistral provider implementation
//!
//! Mistral speaks the chat-completions wire format, so this provider reuses
//! the OpenAI converter, parser and stream; only the endpoint, defaults and
//! error attribution are its own.

use crate::http::{create_headers, HttpClient, ReqwestClient};
use crate::mistral::config::MistralConfig;
use crate::openai::{ChatCompletionsStream, OpenAIConverter, OpenAIParser};
use crate::traits::{RequestConverter, ResponseParser};
use async_trait::async_trait;
use parlance_core::{Error, Provider, Request, Response};
use std::sync::Arc;

const PROVIDER: &str = "mistral";

/// Mistral provider for chat completions
#[derive(Clone)]
pub struct Mistral {
    config: MistralConfig,
    client: Arc<dyn HttpClient>,
    converter: OpenAIConverter,
    parser: OpenAIParser,
}

impl Mistral {
    /// Create a new Mistral provider with the given configuration
    pub fn new(config: MistralConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::with_client(config, client))
    }

    /// Create a new Mistral provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::new(MistralConfig::new(api_key))
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(config: MistralConfig, client: Arc<dyn HttpClient>) -> Self {
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
impl Provider for Mistral {
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
