//! ContentHasher trait for computing digests.
//!
//! Defined in gemchat-core so the credential holder can fingerprint secrets
//! without coupling to a specific hashing algorithm. The
//! `Sha256ContentHasher` adapter lives in gemchat-infra.

/// Abstraction over content hashing.
///
/// Used by `CredentialHolder` to derive the display-safe fingerprint of
/// the API credential.
pub trait ContentHasher: Send + Sync {
    /// Compute a lowercase hex-encoded digest of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
