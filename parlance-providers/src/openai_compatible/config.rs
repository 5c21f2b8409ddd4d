//! Configuration for OpenAI-compatible endpoints

/// Configuration for a generic OpenAI-compatible endpoint
///
/// Unlike the named providers there is no default base URL or model; both
/// describe a deployment the library cannot guess (NVIDIA NIM, OpenRouter,
/// a self-hosted vLLM, ...). Extra headers are merged into every request,
/// which some gateways require for attribution.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    /// API key for authentication (never logged)
    pub api_key: String,
    /// Base URL for the API (required)
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Additional headers sent with every request
    pub extra_headers: Vec<(String, String)>,
}

impl OpenAICompatibleConfig {
    /// Create a new configuration for the given endpoint
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            default_model: String::new(),
            extra_headers: Vec::new(),
        }
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Get the URL for chat completions
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
