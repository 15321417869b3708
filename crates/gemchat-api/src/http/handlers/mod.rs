//! HTTP request handlers.

pub mod chat;
pub mod credential;
pub mod page;
pub mod session;
