//! Parlance - a unified Rust client for LLM chat-completion APIs
//!
//! This crate normalizes HTTP calls to several LLM providers (OpenAI,
//! Anthropic, Google, Mistral, and any OpenAI-compatible endpoint) into one
//! request/response shape, with SSE streaming and tool-calling pass-through.
//!
//! # Quick Start
//!
//! ```no_run
//! use parlance::prelude::*;
//! use parlance::providers::OpenAI;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), parlance::Error> {
//!     let provider = OpenAI::with_api_key("your-api-key")?;
//!
//!     let response = provider.chat(Request::from("Hello, world!")).await?;
//!     println!("{}", response.content);
//!
//!     provider.close();
//!     Ok(())
//! }
//! ```
//!
//! # Streaming
//!
//! ```no_run
//! use futures::StreamExt;
//! use parlance::prelude::*;
//! use parlance::providers::Anthropic;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), parlance::Error> {
//! let provider = Anthropic::with_api_key("your-api-key")?;
//! let mut stream = provider.chat_stream(Request::from("Tell me a story")).await?;
//!
//! while let Some(event) = stream.next().await {
//!     match event? {
//!         StreamEvent::Content(delta) => print!("{}", delta.text),
//!         StreamEvent::ToolCall(call) => println!("tool call: {}", call.name),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Re-export core types
pub use parlance_core::*;

/// Provider implementations
pub mod providers {
    pub use parlance_providers::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use parlance_core::{
        Error, FinishReason, Message, Model, Parameters, Provider, Request, Response, Role,
        StreamAccumulator, StreamEvent, Tool, ToolCall, ToolChoice,
    };
}
