//! Cryptographic operations for gemchat.
//!
//! - `hash`: SHA-256 digests for credential fingerprints

pub mod hash;
