//! Streaming types for incremental responses

use crate::types::tool::ToolCall;

/// A chunk of content in a stream
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDelta {
    /// The text content
    pub text: String,
}

/// Events that can occur during streaming
///
/// Tool-call events carry complete calls: providers assemble streamed
/// fragments internally and emit each call once its arguments are whole. A
/// stream signals termination by ending, not with a sentinel event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fragment of generated text
    Content(ContentDelta),
    /// A fully assembled tool call
    ToolCall(ToolCall),
}

/// Accumulates streaming events into a complete message
///
/// Concatenating every content event of a stream reproduces the text the
/// non-streaming endpoint would have returned.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    tool_calls: Vec<ToolCall>,
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a stream event
    pub fn process_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Content(delta) => self.content.push_str(&delta.text),
            StreamEvent::ToolCall(call) => self.tool_calls.push(call),
        }
    }

    /// Get the accumulated content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the accumulated tool calls
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.tool_calls
    }

    /// Consume the accumulator, returning content and tool calls
    pub fn into_parts(self) -> (String, Vec<ToolCall>) {
        (self.content, self.tool_calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_content() {
        let mut acc = StreamAccumulator::new();
        acc.process_event(StreamEvent::Content(ContentDelta {
            text: "Hello, ".into(),
        }));
        acc.process_event(StreamEvent::Content(ContentDelta {
            text: "world".into(),
        }));
        assert_eq!(acc.content(), "Hello, world");
    }

    #[test]
    fn test_accumulator_tool_calls() {
        let mut acc = StreamAccumulator::new();
        acc.process_event(StreamEvent::ToolCall(ToolCall {
            id: "call_0".into(),
            name: "get_weather".into(),
            arguments: r#"{"location":"Paris"}"#.into(),
        }));

        let (content, calls) = acc.into_parts();
        assert!(content.is_empty());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_weather");
    }
}
