//! Anthropic provider configuration

use crate::constants::{
    ANTHROPIC_DEFAULT_BASE_URL, ANTHROPIC_DEFAULT_MODEL, ANTHROPIC_VERSION,
};

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication (never logged)
    pub api_key: String,
    /// Base URL for the Anthropic API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Value of the `anthropic-version` header
    pub version: String,
}

impl AnthropicConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ANTHROPIC_DEFAULT_BASE_URL.to_string(),
            default_model: ANTHROPIC_DEFAULT_MODEL.to_string(),
            version: ANTHROPIC_VERSION.to_string(),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get the URL for the messages endpoint
    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }
}
