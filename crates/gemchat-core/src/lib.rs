//! Business logic and gateway trait definitions for gemchat.
//!
//! This crate defines the "ports" (the `ModelGateway` and `ContentHasher`
//! traits) that the infrastructure layer implements, plus the in-memory
//! conversational session model. It depends only on `gemchat-types` --
//! never on `gemchat-infra` or any network crate.

pub mod chat;
pub mod credential;
pub mod llm;
pub mod render;
pub mod service;
pub mod state;
