//! Anthropic streaming implementation

use crate::error;
use crate::http::ByteStream;
use crate::sse::{sse_data, LineBuffer, ToolCallAssembler};
use futures_core::Stream;
use parlance_core::{ContentDelta, Error, StreamEvent};
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

const PROVIDER: &str = "anthropic";

/// Streaming response from the Anthropic Messages API
///
/// Text deltas become content events. A `tool_use` block start opens a call
/// in the assembler; `input_json_delta` fragments are concatenated until the
/// matching `content_block_stop` completes the call and emits it.
/// `message_stop` ends the stream with no final event.
pub struct AnthropicStream {
    inner: ByteStream,
    buffer: LineBuffer,
    assembler: ToolCallAssembler,
    pending: VecDeque<StreamEvent>,
    done: bool,
}

impl AnthropicStream {
    /// Wrap a raw SSE byte stream
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            buffer: LineBuffer::new(),
            assembler: ToolCallAssembler::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<(), Error> {
        let Some(data) = sse_data(line) else {
            return Ok(());
        };

        let event: AnthropicStreamEvent = match serde_json::from_str(data) {
            Ok(event) => event,
            Err(e) => {
                if self.assembler.in_flight() {
                    return Err(error::response_error(
                        PROVIDER,
                        format!("malformed chunk during tool call assembly: {}", e),
                    ));
                }
                tracing::warn!(provider = PROVIDER, error = %e, "skipping malformed stream chunk");
                return Ok(());
            }
        };

        match event {
            AnthropicStreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                if let StreamContentBlock::ToolUse { id, name } = content_block {
                    self.assembler.begin(index, id, name);
                }
            }
            AnthropicStreamEvent::ContentBlockDelta { index, delta } => match delta {
                StreamDelta::TextDelta { text } => {
                    if !text.is_empty() {
                        self.pending
                            .push_back(StreamEvent::Content(ContentDelta { text }));
                    }
                }
                StreamDelta::InputJsonDelta { partial_json } => {
                    if !self.assembler.append_arguments(index, &partial_json) {
                        return Err(error::response_error(
                            PROVIDER,
                            "input_json_delta without a started tool_use block",
                        ));
                    }
                }
                StreamDelta::Other => {}
            },
            AnthropicStreamEvent::ContentBlockStop { index } => {
                if let Some(call) = self.assembler.complete(index) {
                    self.pending.push_back(StreamEvent::ToolCall(call));
                }
            }
            AnthropicStreamEvent::Error { error: detail } => {
                return Err(error::response_error(PROVIDER, detail.to_string()));
            }
            AnthropicStreamEvent::MessageStop => {
                for call in self.assembler.finish_all() {
                    self.pending.push_back(StreamEvent::ToolCall(call));
                }
                self.done = true;
            }
            // message_start, message_delta, ping and unknown event types
            // carry nothing the unified stream surfaces
            AnthropicStreamEvent::Other => {}
        }

        Ok(())
    }
}

impl Stream for AnthropicStream {
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
                    for call in this.assembler.finish_all() {
                        this.pending.push_back(StreamEvent::ToolCall(call));
                    }
                    this.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

// Streaming event structures; unknown event types map to Other
#[derive(Deserialize)]
#[serde(tag = "type")]
enum AnthropicStreamEvent {
    #[serde(rename = "content_block_start")]
    ContentBlockStart {
        index: usize,
        content_block: StreamContentBlock,
    },
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { index: usize, delta: StreamDelta },
    #[serde(rename = "content_block_stop")]
    ContentBlockStop { index: usize },
    #[serde(rename = "message_stop")]
    MessageStop,
    #[serde(rename = "error")]
    Error { error: Value },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum StreamContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse { id: String, name: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum StreamDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(rename = "input_json_delta")]
    InputJsonDelta { partial_json: String },
    #[serde(other)]
    Other,
}
