//! Shared domain types for gemchat.
//!
//! This crate contains the types used across the gemchat workspace:
//! chat sessions and messages, model-gateway requests and stream events,
//! application configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
