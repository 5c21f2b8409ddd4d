//! Mistral provider configuration

use crate::constants::{MISTRAL_DEFAULT_BASE_URL, MISTRAL_DEFAULT_MODEL};

/// Configuration for the Mistral provider
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// API key for authentication (never logged)
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
}

impl MistralConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: MISTRAL_DEFAULT_BASE_URL.to_string(),
            default_model: MISTRAL_DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Get the URL for chat completions
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
