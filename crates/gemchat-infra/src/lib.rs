//! Infrastructure layer for gemchat.
//!
//! Contains implementations of the traits defined in `gemchat-core`: the
//! Gemini streaming gateway and SHA-256 hashing, plus the TOML config
//! loader and the startup credential lookup.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod secret;
