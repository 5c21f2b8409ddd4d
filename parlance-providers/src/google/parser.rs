//! Google response parsing

use crate::error;
use crate::traits::ResponseParser;
use async_trait::async_trait;
use parlance_core::{Error, FinishReason, Response, ResponseMetadata, ToolCall, Usage};
use serde::Deserialize;
use serde_json::Value;

/// Parses Google generateContent responses
///
/// Text parts are concatenated; `functionCall` parts become tool calls with
/// synthetic ids, since Google does not supply any.
#[derive(Clone, Copy)]
pub struct GoogleParser;

#[async_trait]
impl ResponseParser for GoogleParser {
    async fn parse_response(&self, value: Value) -> Result<Response, Error> {
        let response: GoogleResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| error::response_error("google", "No candidates in response"))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        if let Some(parts) = candidate.content.map(|c| c.parts) {
            for part in parts {
                if let Some(text) = part.text {
                    content.push_str(&text);
                }
                if let Some(call) = part.function_call {
                    tool_calls.push(ToolCall {
                        id: format!("call_{}", tool_calls.len()),
                        name: call.name,
                        arguments: call.args.unwrap_or_else(|| Value::Object(Default::default())).to_string(),
                    });
                }
            }
        }

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(|r| parse_finish_reason(r, !tool_calls.is_empty()));

        let metadata = ResponseMetadata {
            model: response.model_version,
            id: response.response_id,
            usage: response.usage_metadata.map(|u| Usage {
                prompt_tokens: u.prompt_token_count.unwrap_or(0),
                completion_tokens: u.candidates_token_count.unwrap_or(0),
                total_tokens: u.total_token_count.unwrap_or(0),
            }),
            finish_reason,
        };

        Ok(Response {
            content,
            tool_calls,
            metadata,
        })
    }
}

fn parse_finish_reason(reason: &str, has_tool_calls: bool) -> FinishReason {
    match reason {
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" => FinishReason::ContentFilter,
        _ if has_tool_calls => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    }
}

// Response structures; unknown fields are ignored
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
    pub response_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    pub text: Option<String>,
    pub function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    pub args: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_text_parts_are_concatenated() {
        let value = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello"}, {"text": ", world"}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 4,
                "candidatesTokenCount": 3,
                "totalTokenCount": 7
            },
            "modelVersion": "gemini-1.5-flash"
        });

        let response = GoogleParser.parse_response(value).await.unwrap();
        assert_eq!(response.content, "Hello, world");
        assert_eq!(response.metadata.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.metadata.usage.as_ref().unwrap().total_tokens, 7);
        assert_eq!(
            response.metadata.model.as_deref(),
            Some("gemini-1.5-flash")
        );
    }

    #[tokio::test]
    async fn test_function_call_gets_synthetic_id() {
        let value = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "get_weather",
                            "args": {"location": "Paris"}
                        }
                    }]
                },
                "finishReason": "STOP"
            }]
        });

        let response = GoogleParser.parse_response(value).await.unwrap();
        assert_eq!(response.tool_calls.len(), 1);

        let call = &response.tool_calls[0];
        assert_eq!(call.id, "call_0");
        assert_eq!(call.name, "get_weather");
        assert_eq!(call.parsed_arguments().unwrap()["location"], "Paris");
        assert_eq!(
            response.metadata.finish_reason,
            Some(FinishReason::ToolCalls)
        );
    }

    #[tokio::test]
    async fn test_zero_candidates_is_api_error() {
        let value = json!({"candidates": []});
        let err = GoogleParser.parse_response(value).await.unwrap_err();
        match err {
            Error::Api { provider, .. } => assert_eq!(provider, "google"),
            e => panic!("Expected Api error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_safety_maps_to_content_filter() {
        let value = json!({
            "candidates": [{"finishReason": "SAFETY"}]
        });

        let response = GoogleParser.parse_response(value).await.unwrap();
        assert_eq!(response.content, "");
        assert_eq!(
            response.metadata.finish_reason,
            Some(FinishReason::ContentFilter)
        );
    }
}
