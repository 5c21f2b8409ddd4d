//! Google provider configuration

use crate::constants::{GOOGLE_DEFAULT_BASE_URL, GOOGLE_DEFAULT_MODEL};

/// Configuration for the Google Generative Language provider
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key; travels as a `key` query parameter, not a header
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
}

impl GoogleConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GOOGLE_DEFAULT_BASE_URL.to_string(),
            default_model: GOOGLE_DEFAULT_MODEL.to_string(),
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

    /// URL for the non-streaming generate endpoint; the model is part of the
    /// path
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    /// URL for the SSE streaming generate endpoint
    pub fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, model, self.api_key
        )
    }
}
