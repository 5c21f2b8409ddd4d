//! Response parsing for the chat-completions wire format

use crate::error;
use crate::traits::ResponseParser;
use async_trait::async_trait;
use parlance_core::{Error, FinishReason, Response, ResponseMetadata, ToolCall, Usage};
use serde::Deserialize;
use serde_json::Value;

/// Parses chat-completions responses
///
/// The provider name only flavors error messages, so the same parser serves
/// OpenAI, Mistral and OpenAI-compatible endpoints.
#[derive(Clone, Copy)]
pub struct OpenAIParser {
    provider: &'static str,
}

impl OpenAIParser {
    /// Create a parser reporting errors under the given provider name
    pub const fn new(provider: &'static str) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ResponseParser for OpenAIParser {
    async fn parse_response(&self, value: Value) -> Result<Response, Error> {
        let response: ChatCompletionResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| error::response_error(self.provider, "No choices in response"))?;

        let content = choice.message.content.unwrap_or_default();
        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let metadata = ResponseMetadata {
            model: response.model,
            id: response.id,
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(parse_finish_reason),
        };

        Ok(Response {
            content,
            tool_calls,
            metadata,
        })
    }
}

pub(crate) fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "length" => FinishReason::Length,
        "tool_calls" | "function_call" => FinishReason::ToolCalls,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

// Response structures; unknown fields are ignored for forward compatibility
#[derive(Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageResponse,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallResponse>>,
}

#[derive(Deserialize)]
struct ToolCallResponse {
    id: String,
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_parse_text_response() {
        let value = json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8}
        });

        let response = OpenAIParser::new("openai")
            .parse_response(value)
            .await
            .unwrap();

        assert_eq!(response.content, "Hello there");
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.metadata.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.metadata.usage.as_ref().unwrap().total_tokens, 8);
    }

    #[tokio::test]
    async fn test_parse_tool_call_response() {
        let value = json!({
            "id": "chatcmpl-2",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {
                            "name": "get_weather",
                            "arguments": "{\"location\":\"Paris\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = OpenAIParser::new("openai")
            .parse_response(value)
            .await
            .unwrap();

        assert_eq!(response.content, "");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "get_weather");
        assert!(response.tool_calls[0].parsed_arguments().is_ok());
        assert_eq!(
            response.metadata.finish_reason,
            Some(FinishReason::ToolCalls)
        );
    }

    #[tokio::test]
    async fn test_zero_choices_is_api_error() {
        let value = json!({"id": "x", "model": "m", "choices": []});

        let err = OpenAIParser::new("mistral")
            .parse_response(value)
            .await
            .unwrap_err();

        match err {
            Error::Api {
                provider, status, ..
            } => {
                assert_eq!(provider, "mistral");
                assert_eq!(status, None);
            }
            e => panic!("Expected Api error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let value = json!({
            "id": "x",
            "model": "m",
            "system_fingerprint": "fp_123",
            "choices": [{
                "message": {"content": "ok", "refusal": null},
                "finish_reason": "stop",
                "logprobs": null
            }]
        });

        let response = OpenAIParser::new("openai")
            .parse_response(value)
            .await
            .unwrap();
        assert_eq!(response.content, "ok");
    }
}
