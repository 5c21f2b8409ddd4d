//! Core traits and types for the Parlance LLM client
//!
//! This crate provides the fundamental abstractions shared by every provider:
//! the unified request/response/stream types, the error taxonomy, and the
//! [`Provider`] trait. It deliberately carries no HTTP machinery.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod provider;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use provider::Provider;
pub use types::{
    message::{Message, Role},
    request::{Model, Parameters, ParametersBuilder, Request, RequestBuilder},
    response::{FinishReason, Response, ResponseMetadata, Usage},
    stream::{ContentDelta, StreamAccumulator, StreamEvent},
    tool::{Tool, ToolCall, ToolChoice},
};
