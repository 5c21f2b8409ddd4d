//! Conversion between Parlance types and the Google generateContent API

use crate::traits::RequestConverter;
use async_trait::async_trait;
use parlance_core::{Error, Message, Request, Role, ToolChoice};
use serde_json::{json, Value};

/// Converts generic requests to the Google generateContent format
///
/// Google only knows `user` and `model` roles: system and tool messages fold
/// into `user` turns, tool results travel as `functionResponse` parts and
/// assistant tool calls as `functionCall` parts.
#[derive(Clone, Copy)]
pub struct GoogleConverter;

#[async_trait]
impl RequestConverter for GoogleConverter {
    async fn convert_request(&self, request: &Request, _model: &str) -> Result<Value, Error> {
        let mut body = json!({
            "contents": convert_contents(&request.messages),
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = request.parameters.max_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max_tokens));
        }
        if let Some(temperature) = request.parameters.temperature {
            generation_config.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = request.parameters.top_p {
            generation_config.insert("topP".into(), json!(top_p));
        }
        if let Some(stop) = &request.parameters.stop {
            generation_config.insert("stopSequences".into(), json!(stop));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        if !request.tools.is_empty() {
            body["tools"] = json!([{
                "functionDeclarations": request
                    .tools
                    .iter()
                    .map(|tool| {
                        json!({
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters,
                        })
                    })
                    .collect::<Vec<_>>(),
            }]);
        }
        if let Some(choice) = &request.tool_choice {
            body["toolConfig"] = convert_tool_choice(choice);
        }

        if let Some(obj) = body.as_object_mut() {
            for (key, value) in &request.parameters.extra {
                obj.insert(key.clone(), value.clone());
            }
        }

        Ok(body)
    }
}

fn convert_contents(messages: &[Message]) -> Vec<Value> {
    let mut contents = Vec::new();

    for msg in messages {
        let role = match msg.role {
            Role::Assistant => "model",
            _ => "user",
        };

        let mut parts = Vec::new();

        if msg.role == Role::Tool {
            parts.push(json!({
                "functionResponse": {
                    "name": msg.name.clone().unwrap_or_else(|| "unknown".to_string()),
                    "response": { "result": msg.content },
                }
            }));
        } else {
            if !msg.content.is_empty() {
                parts.push(json!({"text": msg.content}));
            }
            for call in &msg.tool_calls {
                parts.push(json!({
                    "functionCall": {
                        "name": call.name,
                        "args": parse_arguments(&call.arguments),
                    }
                }));
            }
        }

        if !parts.is_empty() {
            contents.push(json!({
                "role": role,
                "parts": parts,
            }));
        }
    }

    contents
}

/// Arguments are stored as a JSON string; Google wants the object back
fn parse_arguments(arguments: &str) -> Value {
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::String(arguments.to_string()))
}

fn convert_tool_choice(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!({"functionCallingConfig": {"mode": "AUTO"}}),
        ToolChoice::None => json!({"functionCallingConfig": {"mode": "NONE"}}),
        ToolChoice::Required => json!({"functionCallingConfig": {"mode": "ANY"}}),
        ToolChoice::Specific(name) => json!({
            "functionCallingConfig": {
                "mode": "ANY",
                "allowedFunctionNames": [name],
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_core::{Tool, ToolCall};

    #[tokio::test]
    async fn test_roles_fold_into_user_and_model() {
        let request = Request::builder()
            .message(Message::system("Be terse"))
            .message(Message::user("Hello"))
            .message(Message::assistant("Hi"))
            .build();

        let body = GoogleConverter
            .convert_request(&request, "gemini-1.5-flash")
            .await
            .unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[2]["role"], "model");
        assert_eq!(contents[0]["parts"][0]["text"], "Be terse");
    }

    #[tokio::test]
    async fn test_generation_config() {
        let request = Request::builder()
            .message(Message::user("hi"))
            .max_tokens(64)
            .temperature(0.5)
            .build();

        let body = GoogleConverter
            .convert_request(&request, "gemini-1.5-flash")
            .await
            .unwrap();

        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[tokio::test]
    async fn test_tools_and_tool_config() {
        let request = Request::builder()
            .message(Message::user("weather?"))
            .tool(Tool {
                name: "get_weather".into(),
                description: "Get the weather".into(),
                parameters: json!({"type": "object"}),
            })
            .tool_choice(ToolChoice::Specific("get_weather".into()))
            .build();

        let body = GoogleConverter
            .convert_request(&request, "gemini-1.5-flash")
            .await
            .unwrap();

        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "get_weather"
        );
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(
            body["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"][0],
            "get_weather"
        );
    }

    #[tokio::test]
    async fn test_tool_round_trip_messages() {
        let assistant = Message::assistant("").with_tool_calls(vec![ToolCall {
            id: "call_0".into(),
            name: "get_weather".into(),
            arguments: r#"{"location":"Paris"}"#.into(),
        }]);
        let request = Request::builder()
            .message(Message::user("Weather in Paris?"))
            .message(assistant)
            .message({
                let mut tool = Message::tool(r#"{"temp_c":21}"#, "call_0");
                tool.name = Some("get_weather".into());
                tool
            })
            .build();

        let body = GoogleConverter
            .convert_request(&request, "gemini-1.5-flash")
            .await
            .unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(
            contents[1]["parts"][0]["functionCall"]["args"]["location"],
            "Paris"
        );
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["name"],
            "get_weather"
        );
    }
}
