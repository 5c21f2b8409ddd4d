//! Server-sent-event plumbing shared by the provider streams
//!
//! Providers stream over SSE: each event is a `data:`-prefixed line. This
//! module reassembles lines from network chunks, extracts data payloads, and
//! assembles tool calls whose fragments arrive spread across many chunks.

use parlance_core::ToolCall;
use std::collections::BTreeMap;

/// Buffer management for line-based streaming protocols
///
/// Network chunks split lines arbitrarily; the buffer holds the tail until
/// its newline arrives.
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    /// Create a new line buffer
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Add data to the buffer and return the complete lines it yields
    pub fn add_data(&mut self, data: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(data));

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
            self.buffer.drain(..=pos);
        }

        lines
    }

    /// Take any remaining data out of the buffer
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the payload of a `data:` line
///
/// Returns `None` for SSE comments, `event:` lines, keepalives and anything
/// else that is not a data line; those are skipped by every provider.
pub fn sse_data(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("data:")?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Lifecycle of one in-flight tool call during streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallState {
    /// The call has been announced (id/name seen), no arguments yet
    Started,
    /// Argument fragments are being concatenated
    AccumulatingArguments,
    /// The call has been emitted and must not be emitted again
    Complete,
}

#[derive(Debug)]
struct PartialCall {
    id: String,
    name: String,
    arguments: String,
    state: CallState,
}

impl PartialCall {
    fn new() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            arguments: String::new(),
            state: CallState::Started,
        }
    }

    fn finalize(&mut self) -> ToolCall {
        self.state = CallState::Complete;
        ToolCall {
            id: std::mem::take(&mut self.id),
            name: std::mem::take(&mut self.name),
            arguments: std::mem::take(&mut self.arguments),
        }
    }
}

/// Assembles streamed tool-call fragments into complete calls
///
/// A small state machine per in-flight call, keyed by the provider-assigned
/// index: `Started -> AccumulatingArguments -> Complete`. A call reaches
/// `Complete` either explicitly ([`complete`](Self::complete)) or in bulk at
/// turn/stream end ([`finish_all`](Self::finish_all)), and is emitted exactly
/// once.
#[derive(Debug, Default)]
pub struct ToolCallAssembler {
    calls: BTreeMap<usize, PartialCall>,
}

impl ToolCallAssembler {
    /// Create a new assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a call whose id and name are known up front (Anthropic style)
    pub fn begin(&mut self, index: usize, id: impl Into<String>, name: impl Into<String>) {
        let mut call = PartialCall::new();
        call.id = id.into();
        call.name = name.into();
        self.calls.insert(index, call);
    }

    /// Apply one OpenAI-style delta: any of id, name and arguments may be a
    /// fragment to append
    pub fn update(
        &mut self,
        index: usize,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) {
        let call = self.calls.entry(index).or_insert_with(PartialCall::new);
        if call.state == CallState::Complete {
            return;
        }
        if let Some(id) = id {
            call.id.push_str(id);
        }
        if let Some(name) = name {
            call.name.push_str(name);
        }
        if let Some(arguments) = arguments {
            call.arguments.push_str(arguments);
            call.state = CallState::AccumulatingArguments;
        }
    }

    /// Append an argument fragment to a call begun earlier
    ///
    /// Returns false if no call is in flight at that index, which means the
    /// stream lost the block that announced it.
    pub fn append_arguments(&mut self, index: usize, fragment: &str) -> bool {
        match self.calls.get_mut(&index) {
            Some(call) if call.state != CallState::Complete => {
                call.arguments.push_str(fragment);
                call.state = CallState::AccumulatingArguments;
                true
            }
            _ => false,
        }
    }

    /// Complete the call at `index` and return it
    pub fn complete(&mut self, index: usize) -> Option<ToolCall> {
        match self.calls.get_mut(&index) {
            Some(call) if call.state != CallState::Complete => Some(call.finalize()),
            _ => None,
        }
    }

    /// Flush every call not yet complete, in index order
    ///
    /// Called when the provider signals the turn is over (`finish_reason`,
    /// `[DONE]`) or when the byte stream simply ends. Entries that never saw
    /// a name are dropped rather than emitted half-formed.
    pub fn finish_all(&mut self) -> Vec<ToolCall> {
        self.calls
            .values_mut()
            .filter(|c| c.state != CallState::Complete && !c.name.is_empty())
            .map(PartialCall::finalize)
            .collect()
    }

    /// Whether any call is mid-assembly
    ///
    /// Used by the streams to decide if a malformed chunk can be skipped:
    /// while a call is in flight, a lost chunk may hold argument fragments,
    /// so skipping would corrupt the call.
    pub fn in_flight(&self) -> bool {
        self.calls
            .values()
            .any(|c| c.state != CallState::Complete)
    }
}
