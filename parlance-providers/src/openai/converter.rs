//! Request conversion for the chat-completions wire format

use crate::traits::RequestConverter;
use async_trait::async_trait;
use parlance_core::{Error, Message, Request, ToolChoice};
use serde_json::{json, Value};

/// Converts generic requests to the chat-completions format
///
/// Shared by OpenAI, Mistral and OpenAI-compatible endpoints, whose wire
/// formats coincide.
#[derive(Clone, Copy)]
pub struct OpenAIConverter;

#[async_trait]
impl RequestConverter for OpenAIConverter {
    async fn convert_request(&self, request: &Request, model: &str) -> Result<Value, Error> {
        let mut body = json!({
            "model": model,
            "messages": convert_messages(&request.messages),
        });

        if let Some(max_tokens) = request.parameters.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = request.parameters.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = request.parameters.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &request.parameters.stop {
            body["stop"] = json!(stop);
        }

        if !request.tools.is_empty() {
            body["tools"] = json!(convert_tools(request));
        }
        if let Some(choice) = &request.tool_choice {
            body["tool_choice"] = convert_tool_choice(choice);
        }

        if let Some(obj) = body.as_object_mut() {
            for (key, value) in &request.parameters.extra {
                obj.insert(key.clone(), value.clone());
            }
        }

        Ok(body)
    }
}

fn convert_messages(messages: &[Message]) -> Vec<Value> {
    messages.iter().map(convert_message).collect()
}

fn convert_message(message: &Message) -> Value {
    let mut msg = json!({
        "role": message.role.as_str(),
        "content": message.content,
    });

    if !message.tool_calls.is_empty() {
        msg["tool_calls"] = json!(message
            .tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments,
                    },
                })
            })
            .collect::<Vec<_>>());
    }
    if let Some(tool_call_id) = &message.tool_call_id {
        msg["tool_call_id"] = json!(tool_call_id);
    }
    if let Some(name) = &message.name {
        msg["name"] = json!(name);
    }

    msg
}

fn convert_tools(request: &Request) -> Vec<Value> {
    request
        .tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                },
            })
        })
        .collect()
}

fn convert_tool_choice(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Specific(name) => json!({
            "type": "function",
            "function": { "name": name },
        }),
    }
}
