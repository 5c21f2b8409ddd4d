//! Streaming integration tests across providers
//!
//! SSE fixtures are served by wiremock with `text/event-stream` bodies. The
//! key properties: events preserve chunk order deterministically, the
//! concatenated content equals the non-streaming equivalent, and nothing is
//! emitted after the provider's stop marker.

use futures::StreamExt;
use parlance::prelude::*;
use parlance::providers::anthropic::AnthropicConfig;
use parlance::providers::google::GoogleConfig;
use parlance::providers::openai::OpenAIConfig;
use parlance::providers::{Anthropic, Google, OpenAI};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sse(server: &MockServer, endpoint: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(body.to_string(), "text/event-stream"),
        )
        .mount(server)
        .await;
}

async fn collect<S>(mut stream: S) -> Vec<StreamEvent>
where
    S: futures::Stream<Item = Result<StreamEvent, Error>> + Unpin,
{
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event.unwrap());
    }
    events
}

fn content_of(events: &[StreamEvent]) -> String {
    let mut acc = StreamAccumulator::new();
    for event in events {
        acc.process_event(event.clone());
    }
    acc.into_parts().0
}

const OPENAI_SSE: &str = "\
data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n\
data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{\"content\":\"Once\"}}]}\n\n\
data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{\"content\":\" upon\"}}]}\n\n\
data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{\"content\":\" a time\"}}]}\n\n\
data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n\
data: [DONE]\n\n";

#[tokio::test]
async fn openai_stream_matches_nonstreaming_content() {
    let server = MockServer::start().await;
    // Streaming requests must carry stream: true
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(OPENAI_SSE, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let provider = OpenAI::new(OpenAIConfig::new("k").with_base_url(server.uri())).unwrap();
    let events = collect(provider.chat_stream(Request::from("story")).await.unwrap()).await;

    assert_eq!(content_of(&events), "Once upon a time");

    // Same fixture, same event sequence: the parse is deterministic
    let replay = collect(provider.chat_stream(Request::from("story")).await.unwrap()).await;
    assert_eq!(events, replay);
}

#[tokio::test]
async fn openai_stream_stops_at_done_marker() {
    let server = MockServer::start().await;
    let body = "\
data: {\"choices\":[{\"delta\":{\"content\":\"visible\"}}]}\n\n\
data: [DONE]\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"after the marker\"}}]}\n\n";
    mount_sse(&server, "/chat/completions", body).await;

    let provider = OpenAI::new(OpenAIConfig::new("k").with_base_url(server.uri())).unwrap();
    let events = collect(provider.chat_stream(Request::from("hi")).await.unwrap()).await;

    assert_eq!(events.len(), 1);
    assert_eq!(content_of(&events), "visible");
}

#[tokio::test]
async fn openai_stream_assembles_tool_call_fragments() {
    let server = MockServer::start().await;
    let body = "\
data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_7\",\"function\":{\"name\":\"get_weather\",\"arguments\":\"\"}}]}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"location\\\":\"}}]}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"Paris\\\"}\"}}]}}]}\n\n\
data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n\
data: [DONE]\n\n";
    mount_sse(&server, "/chat/completions", body).await;

    let provider = OpenAI::new(OpenAIConfig::new("k").with_base_url(server.uri())).unwrap();
    let request = Request::builder()
        .message(Message::user("weather?"))
        .tool(Tool {
            name: "get_weather".into(),
            description: "Get the weather".into(),
            parameters: json!({"type": "object"}),
        })
        .build();
    let events = collect(provider.chat_stream(request).await.unwrap()).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::ToolCall(call) => {
            assert_eq!(call.id, "call_7");
            assert_eq!(call.name, "get_weather");
            assert_eq!(
                call.parsed_arguments().unwrap()["location"],
                "Paris"
            );
        }
        e => panic!("expected a tool call event, got {:?}", e),
    }
}

#[tokio::test]
async fn anthropic_stream_content_and_tool_calls_interleave_in_order() {
    let server = MockServer::start().await;
    let body = "\
event: message_start\n\
data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\",\"model\":\"claude-3-5-haiku-latest\"}}\n\n\
event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Let me check\"}}\n\n\
event: content_block_start\n\
data: {\"type\":\"content_block_start\",\"index\":1,\"content_block\":{\"type\":\"tool_use\",\"id\":\"toolu_9\",\"name\":\"get_weather\",\"input\":{}}}\n\n\
event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":1,\"delta\":{\"type\":\"input_json_delta\",\"partial_json\":\"{\\\"location\\\":\\\"Paris\\\"}\"}}\n\n\
event: content_block_stop\n\
data: {\"type\":\"content_block_stop\",\"index\":1}\n\n\
event: message_stop\n\
data: {\"type\":\"message_stop\"}\n\n";
    mount_sse(&server, "/messages", body).await;

    let provider = Anthropic::new(AnthropicConfig::new("k").with_base_url(server.uri())).unwrap();
    let events = collect(provider.chat_stream(Request::from("weather?")).await.unwrap()).await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::Content(d) if d.text == "Let me check"));
    match &events[1] {
        StreamEvent::ToolCall(call) => {
            assert_eq!(call.id, "toolu_9");
            assert_eq!(call.parsed_arguments().unwrap()["location"], "Paris");
        }
        e => panic!("expected a tool call event, got {:?}", e),
    }
}

#[tokio::test]
async fn anthropic_stream_matches_nonstreaming_content() {
    let sse_server = MockServer::start().await;
    let body = "\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}\n\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\", world\"}}\n\n\
data: {\"type\":\"message_stop\"}\n\n";
    mount_sse(&sse_server, "/messages", body).await;

    let json_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-haiku-latest",
            "content": [
                {"type": "text", "text": "Hello"},
                {"type": "text", "text": ", world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1, "output_tokens": 2}
        })))
        .mount(&json_server)
        .await;

    let streaming =
        Anthropic::new(AnthropicConfig::new("k").with_base_url(sse_server.uri())).unwrap();
    let blocking =
        Anthropic::new(AnthropicConfig::new("k").with_base_url(json_server.uri())).unwrap();

    let events = collect(streaming.chat_stream(Request::from("hi")).await.unwrap()).await;
    let response = blocking.chat(Request::from("hi")).await.unwrap();

    assert_eq!(content_of(&events), response.content);
}

#[tokio::test]
async fn google_stream_emits_whole_parts_per_chunk() {
    let server = MockServer::start().await;
    let body = "\
data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Once\"}]}}]}\n\n\
data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" upon a time\"}]},\"finishReason\":\"STOP\"}]}\n\n";
    mount_sse(
        &server,
        "/models/gemini-1.5-flash:streamGenerateContent",
        body,
    )
    .await;

    let provider = Google::new(GoogleConfig::new("k").with_base_url(server.uri())).unwrap();
    let events = collect(provider.chat_stream(Request::from("story")).await.unwrap()).await;

    assert_eq!(events.len(), 2);
    assert_eq!(content_of(&events), "Once upon a time");
}

#[tokio::test]
async fn stream_error_status_maps_to_taxonomy_before_any_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let provider = OpenAI::new(OpenAIConfig::new("k").with_base_url(server.uri())).unwrap();
    let err = provider.chat_stream(Request::from("hi")).await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}

#[tokio::test]
async fn malformed_chunk_is_skipped_mid_stream() {
    let server = MockServer::start().await;
    let body = "\
data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n\
data: {oops, not json}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n\n\
data: [DONE]\n\n";
    mount_sse(&server, "/chat/completions", body).await;

    let provider = OpenAI::new(OpenAIConfig::new("k").with_base_url(server.uri())).unwrap();
    let events = collect(provider.chat_stream(Request::from("hi")).await.unwrap()).await;
    assert_eq!(content_of(&events), "ok!");
}
