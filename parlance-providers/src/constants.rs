//! Constants for provider implementations

/// Default OpenAI base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default Anthropic base URL
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default Anthropic model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic requires max_tokens; used when the request does not set one
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default Google Generative Language base URL
pub const GOOGLE_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Google model
pub const GOOGLE_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Mistral base URL
pub const MISTRAL_DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Default Mistral model
pub const MISTRAL_DEFAULT_MODEL: &str = "mistral-small-latest";
