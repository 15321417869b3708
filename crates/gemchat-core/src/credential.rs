//! In-memory holder for the single API credential.
//!
//! The secret is kept in a [`SecretString`] for the process lifetime and is
//! never written to disk, logged, or shown. Users confirm which key is
//! active through a short fingerprint derived from its digest.

use std::fmt;

use secrecy::SecretString;
use tracing::info;

use gemchat_types::error::ChatError;

use crate::service::hash::ContentHasher;

/// Number of hex characters of the digest exposed as the fingerprint.
pub const FINGERPRINT_LEN: usize = 8;

/// Holds the API credential and its display fingerprint.
pub struct CredentialHolder<H: ContentHasher> {
    hasher: H,
    secret: Option<SecretString>,
    fingerprint: Option<String>,
}

impl<H: ContentHasher> CredentialHolder<H> {
    /// Create an unconfigured holder.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            secret: None,
            fingerprint: None,
        }
    }

    /// Store (or replace) the credential and return its fingerprint.
    ///
    /// Surrounding whitespace is trimmed. The only validation is
    /// non-emptiness; an invalid key surfaces when the first model call
    /// fails. No network call is made here.
    pub fn set_credential(&mut self, secret: &str) -> Result<&str, ChatError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(ChatError::EmptyCredential);
        }

        let fingerprint = self.derive_fingerprint(secret);
        info!(fingerprint = %fingerprint, "API credential configured");

        self.secret = Some(SecretString::from(secret.to_string()));
        Ok(self.fingerprint.insert(fingerprint).as_str())
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// The truncated digest of the active credential, if any.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// The active credential, for handing to a gateway.
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret.as_ref()
    }

    fn derive_fingerprint(&self, secret: &str) -> String {
        self.hasher
            .compute_hash(secret)
            .chars()
            .take(FINGERPRINT_LEN)
            .collect()
    }
}

impl<H: ContentHasher> fmt::Debug for CredentialHolder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHolder")
            .field("configured", &self.is_configured())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}
