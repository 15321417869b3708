//! In-memory session store.
//!
//! Owns every `ChatSession` for the lifetime of the process and tracks
//! which one is current. Nothing is persisted: a restart starts empty.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use gemchat_types::chat::{ChatMessage, ChatSession, SessionId, SessionSummary};
use gemchat_types::error::ChatError;

use super::title::title_from_prompt;

/// Mapping from session id to session, plus the current-session pointer.
///
/// Keys are time-derived, so the `BTreeMap` order is creation order.
#[derive(Debug)]
pub struct SessionStore {
    persona: String,
    sessions: BTreeMap<SessionId, ChatSession>,
    current: Option<SessionId>,
}

impl SessionStore {
    /// Create an empty store whose sessions are seeded with `persona`.
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            sessions: BTreeMap::new(),
            current: None,
        }
    }

    /// Create a new session and make it current.
    pub fn create_session(&mut self) -> SessionId {
        self.create_session_at(Utc::now())
    }

    /// Create a new session as of `now` and make it current.
    ///
    /// The session starts with the persona system message. A second
    /// session created within the same second gets a zero-padded `_<nnn>`
    /// suffix.
    pub fn create_session_at(&mut self, now: DateTime<Utc>) -> SessionId {
        let base = SessionId::from_timestamp(now);
        let mut id = base.clone();
        let mut n = 0;
        while self.sessions.contains_key(&id) {
            n += 1;
            id = base.with_suffix(n);
        }

        let session = ChatSession {
            id: id.clone(),
            title: None,
            messages: vec![ChatMessage::system(self.persona.clone())],
            created_at: now,
            updated_at: now,
        };
        self.sessions.insert(id.clone(), session);
        self.current = Some(id.clone());

        info!(session_id = %id, "Session created");
        id
    }

    pub fn current_id(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current.as_ref().and_then(|id| self.sessions.get(id))
    }

    pub fn get(&self, id: &SessionId) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// Make an existing session current.
    pub fn select_session(&mut self, id: &SessionId) -> Result<(), ChatError> {
        if !self.sessions.contains_key(id) {
            return Err(ChatError::SessionNotFound(id.clone()));
        }
        self.current = Some(id.clone());
        debug!(session_id = %id, "Session selected");
        Ok(())
    }

    /// Append a message to a session.
    pub fn append_message(
        &mut self,
        id: &SessionId,
        message: ChatMessage,
    ) -> Result<(), ChatError> {
        let session = self.session_mut(id)?;
        session.messages.push(message);
        Ok(())
    }

    /// Title the session after `text` unless a user message already titled it.
    ///
    /// Returns whether the title was set by this call.
    pub fn set_title_from_first_user_message(
        &mut self,
        id: &SessionId,
        text: &str,
    ) -> Result<bool, ChatError> {
        let session = self.session_mut(id)?;
        if session.title.is_some() {
            return Ok(false);
        }
        session.title = Some(title_from_prompt(text));
        Ok(true)
    }

    /// Record activity on a session.
    pub fn touch(&mut self, id: &SessionId, now: DateTime<Utc>) -> Result<(), ChatError> {
        self.session_mut(id)?.updated_at = now;
        Ok(())
    }

    /// Summaries of every session, most recent id first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions.values().rev().map(ChatSession::summary).collect()
    }

    /// Remove a session. Unknown ids are a no-op.
    ///
    /// Deleting the current session leaves no session current.
    pub fn delete_session(&mut self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            if self.current.as_ref() == Some(id) {
                self.current = None;
            }
            info!(session_id = %id, "Session deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn session_mut(&mut self, id: &SessionId) -> Result<&mut ChatSession, ChatError> {
        self.sessions.get_mut(id).ok_or_else(|| {
            warn!(session_id = %id, "Operation on non-existent session");
            ChatError::SessionNotFound(id.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gemchat_types::chat::MessageRole;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    fn store() -> SessionStore {
        SessionStore::new("You are a test persona.")
    }

    #[test]
    fn test_create_session_seeds_persona_and_sets_current() {
        let mut store = store();
        let id = store.create_session_at(at(10, 0, 0));
        assert_eq!(id.as_str(), "20240501_100000");
        assert_eq!(store.current_id(), Some(&id));

        let session = store.current_session().unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, MessageRole::System);
        assert_eq!(session.messages[0].content, "You are a test persona.");
        assert!(session.title.is_none());
    }

    #[test]
    fn test_same_second_sessions_get_distinct_ids() {
        let mut store = store();
        let first = store.create_session_at(at(10, 0, 0));
        let second = store.create_session_at(at(10, 0, 0));
        let third = store.create_session_at(at(10, 0, 0));
        assert_ne!(first, second);
        assert_eq!(second.as_str(), "20240501_100000_001");
        assert_eq!(third.as_str(), "20240501_100000_002");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_many_same_second_sessions_list_in_creation_order() {
        let mut store = store();
        let created: Vec<SessionId> = (0..12).map(|_| store.create_session_at(at(10, 0, 0))).collect();

        let listed: Vec<SessionId> = store.list_sessions().into_iter().map(|s| s.id).collect();
        let expected: Vec<SessionId> = created.into_iter().rev().collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_append_message_to_missing_session_fails() {
        let mut store = store();
        let missing = SessionId::new("19990101_000000");
        let err = store
            .append_message(&missing, ChatMessage::user("hi"))
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(id) if id == missing));
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = store();
        let id = store.create_session_at(at(10, 0, 0));
        store.append_message(&id, ChatMessage::user("one")).unwrap();
        store.append_message(&id, ChatMessage::assistant("two")).unwrap();
        let contents: Vec<_> = store
            .get(&id)
            .unwrap()
            .visible_messages()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn test_title_set_only_once() {
        let mut store = store();
        let id = store.create_session_at(at(10, 0, 0));
        assert!(store.set_title_from_first_user_message(&id, "First question").unwrap());
        assert!(!store.set_title_from_first_user_message(&id, "Second question").unwrap());
        assert_eq!(store.get(&id).unwrap().title.as_deref(), Some("First question"));
    }

    #[test]
    fn test_list_sessions_most_recent_first() {
        let mut store = store();
        store.create_session_at(at(9, 0, 0));
        store.create_session_at(at(11, 0, 0));
        store.create_session_at(at(10, 0, 0));
        let ids: Vec<_> = store
            .list_sessions()
            .into_iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(
            ids,
            vec!["20240501_110000", "20240501_100000", "20240501_090000"]
        );
    }

    #[test]
    fn test_delete_current_session_clears_current() {
        let mut store = store();
        let old = store.create_session_at(at(9, 0, 0));
        let id = store.create_session_at(at(10, 0, 0));
        assert!(store.delete_session(&id));
        assert!(store.current_id().is_none());
        assert!(store.current_session().is_none());
        assert!(store.get(&old).is_some());
    }

    #[test]
    fn test_delete_other_session_keeps_current() {
        let mut store = store();
        let old = store.create_session_at(at(9, 0, 0));
        let id = store.create_session_at(at(10, 0, 0));
        assert!(store.delete_session(&old));
        assert_eq!(store.current_id(), Some(&id));
    }

    #[test]
    fn test_delete_missing_session_is_noop() {
        let mut store = store();
        let id = store.create_session_at(at(10, 0, 0));
        assert!(!store.delete_session(&SessionId::new("nope")));
        assert!(!store.delete_session(&SessionId::new("nope")));
        assert_eq!(store.current_id(), Some(&id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_select_session() {
        let mut store = store();
        let old = store.create_session_at(at(9, 0, 0));
        store.create_session_at(at(10, 0, 0));
        store.select_session(&old).unwrap();
        assert_eq!(store.current_id(), Some(&old));
        assert!(store.select_session(&SessionId::new("nope")).is_err());
        assert_eq!(store.current_id(), Some(&old));
    }

    #[test]
    fn test_touch_updates_timestamp() {
        let mut store = store();
        let id = store.create_session_at(at(9, 0, 0));
        store.touch(&id, at(9, 30, 0)).unwrap();
        let session = store.get(&id).unwrap();
        assert_eq!(session.created_at, at(9, 0, 0));
        assert_eq!(session.updated_at, at(9, 30, 0));
    }
}
