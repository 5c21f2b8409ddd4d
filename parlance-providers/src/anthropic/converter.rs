//! Conversion between Parlance types and the Anthropic Messages API

use crate::constants::ANTHROPIC_DEFAULT_MAX_TOKENS;
use crate::traits::RequestConverter;
use async_trait::async_trait;
use parlance_core::{Error, Message, Request, Role, ToolChoice};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// Anthropic API request types
#[derive(Debug, Serialize)]
pub(crate) struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AnthropicMessage {
    pub role: String,
    pub content: AnthropicContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum AnthropicContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A content block in an Anthropic message or response
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

// Anthropic API response types; unknown fields are ignored
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Converts generic requests to the Anthropic Messages format
#[derive(Clone, Copy)]
pub struct AnthropicConverter;

#[async_trait]
impl RequestConverter for AnthropicConverter {
    async fn convert_request(&self, request: &Request, model: &str) -> Result<Value, Error> {
        let (system, messages) = split_messages(&request.messages);

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|tool| AnthropicTool {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        input_schema: tool.parameters.clone(),
                    })
                    .collect(),
            )
        };

        let body = AnthropicRequest {
            model: model.to_string(),
            messages,
            max_tokens: request
                .parameters
                .max_tokens
                .unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
            temperature: request.parameters.temperature,
            top_p: request.parameters.top_p,
            stop_sequences: request.parameters.stop.clone(),
            system,
            tools,
            tool_choice: request.tool_choice.as_ref().map(convert_tool_choice),
        };

        let mut body = serde_json::to_value(body)?;
        if let Some(obj) = body.as_object_mut() {
            for (key, value) in &request.parameters.extra {
                obj.insert(key.clone(), value.clone());
            }
        }

        Ok(body)
    }
}

/// Lift system messages into the top-level `system` field and translate the
/// rest into Anthropic messages; the last system message wins.
fn split_messages(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
    let mut system = None;
    let mut converted = Vec::new();

    for msg in messages {
        match msg.role {
            Role::System => {
                system = Some(msg.content.clone());
            }
            Role::Tool => {
                // Tool results travel as user messages holding a
                // tool_result block
                converted.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: AnthropicContent::Blocks(vec![ContentBlock::ToolResult {
                        tool_use_id: msg.tool_call_id.clone().unwrap_or_default(),
                        content: msg.content.clone(),
                    }]),
                });
            }
            _ => {
                let content = if msg.tool_calls.is_empty() {
                    AnthropicContent::Text(msg.content.clone())
                } else {
                    let mut blocks = Vec::new();
                    if !msg.content.is_empty() {
                        blocks.push(ContentBlock::Text {
                            text: msg.content.clone(),
                        });
                    }
                    for call in &msg.tool_calls {
                        blocks.push(ContentBlock::ToolUse {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            input: parse_arguments(&call.arguments),
                        });
                    }
                    AnthropicContent::Blocks(blocks)
                };

                converted.push(AnthropicMessage {
                    role: msg.role.as_str().to_string(),
                    content,
                });
            }
        }
    }

    (system, converted)
}

/// Arguments are stored as a JSON string; Anthropic wants the object back
fn parse_arguments(arguments: &str) -> Value {
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::String(arguments.to_string()))
}

fn convert_tool_choice(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!({"type": "auto"}),
        ToolChoice::None => json!({"type": "none"}),
        // Anthropic has no "required"; "any" is the nearest equivalent
        ToolChoice::Required => json!({"type": "any"}),
        ToolChoice::Specific(name) => json!({"type": "tool", "name": name}),
    }
}
