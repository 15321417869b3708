//! Per-process chat state: the credential plus every session.

use crate::chat::store::SessionStore;
use crate::credential::CredentialHolder;
use crate::service::hash::ContentHasher;

/// Everything a user's page mutates. Shared behind a single lock so a
/// turn, a credential change and a session switch never interleave.
#[derive(Debug)]
pub struct ChatState<H: ContentHasher> {
    pub credential: CredentialHolder<H>,
    pub sessions: SessionStore,
}

impl<H: ContentHasher> ChatState<H> {
    pub fn new(hasher: H, persona: impl Into<String>) -> Self {
        Self {
            credential: CredentialHolder::new(hasher),
            sessions: SessionStore::new(persona),
        }
    }
}
