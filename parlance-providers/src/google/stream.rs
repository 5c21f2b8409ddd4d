//! Google streaming implementation

use crate::google::parser::GoogleResponse;
use crate::http::ByteStream;
use crate::sse::{sse_data, LineBuffer};
use crate::error;
use futures_core::Stream;
use parlance_core::{ContentDelta, Error, StreamEvent, ToolCall};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};

const PROVIDER: &str = "google";

/// Streaming response from the Google streamGenerateContent endpoint
///
/// Each SSE chunk repeats the non-streaming candidate shape, so every text
/// part is one content event and every `functionCall` part is emitted
/// immediately as a complete call; no fragment accumulation is needed. The
/// stream ends when the SSE body ends; there is no terminator chunk.
pub struct GoogleStream {
    inner: ByteStream,
    buffer: LineBuffer,
    pending: VecDeque<StreamEvent>,
    emitted_calls: HashSet<String>,
    call_count: usize,
    done: bool,
}

impl GoogleStream {
    /// Wrap a raw SSE byte stream
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            buffer: LineBuffer::new(),
            pending: VecDeque::new(),
            emitted_calls: HashSet::new(),
            call_count: 0,
            done: false,
        }
    }

    fn handle_line(&mut self, line: &str) {
        let Some(data) = sse_data(line) else {
            return;
        };

        let chunk: GoogleResponse = match serde_json::from_str(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                // Whole parts arrive per chunk, so nothing is mid-assembly
                // and a bad chunk can always be skipped.
                tracing::warn!(provider = PROVIDER, error = %e, "skipping malformed stream chunk");
                return;
            }
        };

        let Some(candidate) = chunk.candidates.into_iter().next() else {
            return;
        };
        let Some(content) = candidate.content else {
            return;
        };

        for part in content.parts {
            if let Some(text) = part.text {
                if !text.is_empty() {
                    self.pending
                        .push_back(StreamEvent::Content(ContentDelta { text }));
                }
            }
            if let Some(call) = part.function_call {
                // Google repeats candidate state across chunks; emit each
                // named call once.
                if self.emitted_calls.insert(call.name.clone()) {
                    let id = format!("call_{}", self.call_count);
                    self.call_count += 1;
                    self.pending.push_back(StreamEvent::ToolCall(ToolCall {
                        id,
                        name: call.name,
                        arguments: call
                            .args
                            .unwrap_or_else(|| Value::Object(Default::default()))
                            .to_string(),
                    }));
                }
            }
        }
    }
}

impl Stream for GoogleStream {
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
                        this.handle_line(&line);
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(error::network_error(e))));
                }
                Poll::Ready(None) => {
                    if let Some(line) = this.buffer.flush() {
                        this.handle_line(line.trim());
                    }
                    this.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
