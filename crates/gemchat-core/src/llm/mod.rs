//! Model gateway abstraction for gemchat.
//!
//! `ModelGateway` is the seam between the conversation controller and the
//! hosted generative API; concrete gateways live in gemchat-infra.

pub mod gateway;
