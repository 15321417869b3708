//! Model gateway implementations for gemchat.

pub mod gemini;
