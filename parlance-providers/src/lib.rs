//! Provider implementations for various LLM services

#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod http;
pub mod sse;
pub mod traits;

// Provider implementations
pub mod anthropic;
pub mod google;
pub mod mistral;
pub mod openai;
pub mod openai_compatible;

// Re-export provider types
pub use anthropic::Anthropic;
pub use google::Google;
pub use mistral::Mistral;
pub use openai::OpenAI;
pub use openai_compatible::OpenAICompatible;

// Re-export common traits
pub use traits::{RequestConverter, ResponseParser};
