//! Streaming for the chat-completions wire format

use crate::error;
use crate::http::ByteStream;
use crate::sse::{sse_data, LineBuffer, ToolCallAssembler};
use futures_core::Stream;
use parlance_core::{ContentDelta, Error, StreamEvent};
use serde::Deserialize;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Streaming response in the chat-completions format
///
/// Used by OpenAI, Mistral and OpenAI-compatible endpoints. Content deltas
/// are yielded as they arrive; tool-call fragments are accumulated by index
/// and emitted as complete calls when the chunk stream signals
/// `finish_reason: "tool_calls"`, on `[DONE]`, or at stream end.
pub struct ChatCompletionsStream {
    inner: ByteStream,
    buffer: LineBuffer,
    assembler: ToolCallAssembler,
    pending: VecDeque<StreamEvent>,
    provider: &'static str,
    done: bool,
}

impl std::fmt::Debug for ChatCompletionsStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsStream")
            .field("provider", &self.provider)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsStream {
    /// Wrap a raw SSE byte stream
    pub fn new(inner: ByteStream, provider: &'static str) -> Self {
        Self {
            inner,
            buffer: LineBuffer::new(),
            assembler: ToolCallAssembler::new(),
            pending: VecDeque::new(),
            provider,
            done: false,
        }
    }

    fn flush_tool_calls(&mut self) {
        for call in self.assembler.finish_all() {
            self.pending.push_back(StreamEvent::ToolCall(call));
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<(), Error> {
        let Some(data) = sse_data(line) else {
            return Ok(());
        };

        if data == "[DONE]" {
            self.flush_tool_calls();
            self.done = true;
            return Ok(());
        }

        let chunk: StreamChunk = match serde_json::from_str(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                // Tolerated unless a tool call is mid-assembly: the lost
                // chunk may hold argument fragments.
                if self.assembler.in_flight() {
                    return Err(error::response_error(
                        self.provider,
                        format!("malformed chunk during tool call assembly: {}", e),
                    ));
                }
                tracing::warn!(provider = self.provider, error = %e, "skipping malformed stream chunk");
                return Ok(());
            }
        };

        if let Some(choice) = chunk.choices.into_iter().next() {
            if let Some(content) = choice.delta.content {
                if !content.is_empty() {
                    self.pending
                        .push_back(StreamEvent::Content(ContentDelta { text: content }));
                }
            }

            if let Some(tool_calls) = choice.delta.tool_calls {
                for tc in tool_calls {
                    self.assembler.update(
                        tc.index,
                        tc.id.as_deref(),
                        tc.function.as_ref().and_then(|f| f.name.as_deref()),
                        tc.function.as_ref().and_then(|f| f.arguments.as_deref()),
                    );
                }
            }

            if choice.finish_reason.as_deref() == Some("tool_calls") {
                self.flush_tool_calls();
            }
        }

        Ok(())
    }
}

impl Stream for ChatCompletionsStream {
    type Item = Result<StreamEvent, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    for line in this.buffer.add_data(&chunk) {
                        if this.done {
                            break;
                        }
                        if let Err(e) = this.handle_line(&line) {
                            this.done = true;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(error::network_error(e))));
                }
                Poll::Ready(None) => {
                    if let Some(line) = this.buffer.flush() {
                        if let Err(e) = this.handle_line(line.trim()) {
                            this.done = true;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                    this.flush_tool_calls();
                    this.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

// Streaming chunk structures; unknown fields are ignored
#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: DeltaContent,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct DeltaContent {
    content: Option<String>,
    tool_calls: Option<Vec<StreamToolCall>>,
}

#[derive(Deserialize)]
struct StreamToolCall {
    #[serde(default)]
    index: usize,
    id: Option<String>,
    function: Option<StreamFunction>,
}

#[derive(Deserialize)]
struct StreamFunction {
    name: Option<String>,
    arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use futures::StreamExt;

    fn stream_from(chunks: Vec<&'static str>) -> ChatCompletionsStream {
        let byte_stream = stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, reqwest::Error>(bytes::Bytes::from_static(c.as_bytes()))),
        );
        ChatCompletionsStream::new(Box::pin(byte_stream), "openai")
    }

    #[tokio::test]
    async fn test_content_events_in_order() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);

        let mut collected = String::new();
        while let Some(event) = s.next().await {
            match event.unwrap() {
                StreamEvent::Content(delta) => collected.push_str(&delta.text),
                e => panic!("unexpected event {:?}", e),
            }
        }
        assert_eq!(collected, "Hello");
    }

    #[tokio::test]
    async fn test_nothing_after_done_marker() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: [DONE]\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ghost\"}}]}\n\n",
        ]);

        let mut events = Vec::new();
        while let Some(event) = s.next().await {
            events.push(event.unwrap());
        }
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            StreamEvent::Content(ContentDelta { text: "Hi".into() })
        );
    }

    #[tokio::test]
    async fn test_tool_call_assembled_across_chunks() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_7\",\"function\":{\"name\":\"get_weather\",\"arguments\":\"\"}}]}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"location\\\":\"}}]}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"Paris\\\"}\"}}]}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n",
            "data: [DONE]\n\n",
        ]);

        let mut calls = Vec::new();
        while let Some(event) = s.next().await {
            match event.unwrap() {
                StreamEvent::ToolCall(call) => calls.push(call),
                e => panic!("unexpected event {:?}", e),
            }
        }
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_7");
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, "{\"location\":\"Paris\"}");
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_skipped() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            "data: {this is not json\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);

        let mut collected = String::new();
        while let Some(event) = s.next().await {
            match event.unwrap() {
                StreamEvent::Content(delta) => collected.push_str(&delta.text),
                e => panic!("unexpected event {:?}", e),
            }
        }
        assert_eq!(collected, "ok!");
    }

    #[tokio::test]
    async fn test_malformed_chunk_during_tool_assembly_fails() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"function\":{\"name\":\"f\",\"arguments\":\"{\"}}]}}]}\n\n",
            "data: {broken\n\n",
        ]);

        let mut saw_error = false;
        while let Some(event) = s.next().await {
            if let Err(e) = event {
                assert!(matches!(e, Error::Api { .. }));
                saw_error = true;
            }
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn test_tool_calls_flushed_at_stream_end_without_done() {
        let mut s = stream_from(vec![
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"function\":{\"name\":\"f\",\"arguments\":\"{}\"}}]}}]}\n\n",
        ]);

        let mut calls = Vec::new();
        while let Some(event) = s.next().await {
            match event.unwrap() {
                StreamEvent::ToolCall(call) => calls.push(call),
                e => panic!("unexpected event {:?}", e),
            }
        }
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "f");
    }
}
