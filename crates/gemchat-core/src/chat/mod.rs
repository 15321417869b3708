//! The conversational session model.
//!
//! - `store`: in-memory sessions and the current-session pointer
//! - `title`: automatic session titles
//! - `controller`: one request/response turn against the model gateway

pub mod controller;
pub mod store;
pub mod title;
