//! Core provider trait for LLM interactions

use crate::error::Result;
use crate::types::request::Request;
use crate::types::response::Response;
use crate::types::stream::StreamEvent;
use async_trait::async_trait;

/// The fundamental trait for LLM interactions
///
/// One type per provider implements this trait, selected at construction
/// time. Each provider owns one HTTP session, created at construction and
/// shared by every call on the instance.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The stream type returned by this provider
    type Stream: futures_core::Stream<Item = Result<StreamEvent>> + Send + Unpin;

    /// Send a request and await the complete, normalized response
    async fn chat(&self, request: Request) -> Result<Response>;

    /// Send a request and get a lazy stream of events
    ///
    /// The future resolves once response headers arrive; network reads happen
    /// only as the caller polls the stream. Dropping the stream abandons it.
    async fn chat_stream(&self, request: Request) -> Result<Self::Stream>;

    /// Release the underlying HTTP session
    ///
    /// Idempotent; closing twice is a no-op. `chat`/`chat_stream` on a closed
    /// provider fail with [`Error::ClientClosed`](crate::Error::ClientClosed).
    fn close(&self);
}
