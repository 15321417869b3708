//! HTTP layer for gemchat.
//!
//! Axum-based server: the chat page at `/`, a JSON API at `/api/v1/`
//! using the envelope response format, and SSE for streamed turns.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
