//! Anthropic response parsing

use crate::anthropic::converter::{AnthropicResponse, AnthropicUsage, ContentBlock};
use crate::error;
use crate::traits::ResponseParser;
use async_trait::async_trait;
use parlance_core::{Error, FinishReason, Response, ResponseMetadata, ToolCall, Usage};
use serde_json::Value;

/// Parses Anthropic Messages API responses
///
/// Text blocks are concatenated into the unified content string; `tool_use`
/// blocks become tool calls with their `input` object serialized back into a
/// JSON string.
#[derive(Clone, Copy)]
pub struct AnthropicParser;

#[async_trait]
impl ResponseParser for AnthropicParser {
    async fn parse_response(&self, value: Value) -> Result<Response, Error> {
        let response: AnthropicResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;
        parse_response(response)
    }
}

pub(crate) fn parse_response(response: AnthropicResponse) -> Result<Response, Error> {
    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for block in &response.content {
        match block {
            ContentBlock::Text { text } => content.push_str(text),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                id: id.clone(),
                name: name.clone(),
                arguments: input.to_string(),
            }),
            ContentBlock::ToolResult { .. } => {}
        }
    }

    let metadata = ResponseMetadata {
        model: response.model,
        id: response.id,
        usage: response.usage.as_ref().map(parse_usage),
        finish_reason: response.stop_reason.as_deref().map(parse_stop_reason),
    };

    Ok(Response {
        content,
        tool_calls,
        metadata,
    })
}

fn parse_usage(usage: &AnthropicUsage) -> Usage {
    Usage {
        prompt_tokens: usage.input_tokens,
        completion_tokens: usage.output_tokens,
        total_tokens: usage.input_tokens + usage.output_tokens,
    }
}

fn parse_stop_reason(reason: &str) -> FinishReason {
    match reason {
        "max_tokens" => FinishReason::Length,
        "stop_sequence" => FinishReason::StopSequence,
        "tool_use" => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    }
}
