//! Tool/function calling types

use serde::{Deserialize, Serialize};

/// A tool the model may call
///
/// The `parameters` schema is opaque to the library; it is forwarded to each
/// provider in that provider's tool envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

/// How the model should use tools
///
/// Each provider translates this to its own wire enum; providers lacking an
/// exact equivalent approximate with the nearest supported value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Let the model decide
    Auto,
    /// Never call tools
    None,
    /// Must call a tool
    Required,
    /// Call a specific tool by name
    Specific(String),
}

impl Default for ToolChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// A tool call requested by the model
///
/// `arguments` is always a JSON string after normalization; providers that
/// return an arguments object have it serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this call (synthesized for providers that supply none)
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

impl ToolCall {
    /// Parse the JSON-encoded arguments
    pub fn parsed_arguments(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.arguments)?)
    }
}
