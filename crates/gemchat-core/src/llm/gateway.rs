//! ModelGateway trait definition.
//!
//! This is the abstraction every generative-model backend implements.
//! The only operation is a streamed completion: a lazy, finite,
//! non-restartable sequence of [`StreamEvent`]s terminated by `Done` or
//! by an error.

use std::pin::Pin;

use futures_util::Stream;

use gemchat_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of gateway events.
///
/// Boxed (not RPITIT) so the trait stays object-safe and controllers can
/// take `&dyn ModelGateway`.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for generative-model backends.
///
/// Implementations live in gemchat-infra (e.g., `GeminiProvider`).
pub trait ModelGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request. Returns a stream of events.
    ///
    /// Nothing is sent until the stream is first polled.
    fn stream(&self, request: CompletionRequest) -> EventStream;
}
