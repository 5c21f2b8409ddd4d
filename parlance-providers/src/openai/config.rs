//! OpenAI provider configuration

use crate::constants::{OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL};

/// Configuration for the OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication (never logged)
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
}

impl OpenAIConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
            default_model: OPENAI_DEFAULT_MODEL.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url() {
        let config = OpenAIConfig::new("sk-test").with_base_url("http://localhost:8080/v1");
        assert_eq!(config.chat_url(), "http://localhost:8080/v1/chat/completions");
    }
}
