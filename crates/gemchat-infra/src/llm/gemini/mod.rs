//! Google Gemini model gateway.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`ModelGateway`](gemchat_core::llm::gateway::ModelGateway) trait for
//! the `streamGenerateContent` endpoint of the generative-language API,
//! consumed as server-sent events.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiProvider;
