//! Chat session and message types for gemchat.
//!
//! These types model the conversations held in the in-memory session store:
//! sessions keyed by a time-derived identifier, their ordered messages, and
//! the per-turn state of the conversation controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// `strftime` pattern that derives a session id from its creation second.
pub const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Title shown for sessions that have not received a user message yet.
pub const UNTITLED: &str = "Untitled";

/// Identifier of a chat session.
///
/// Derived from the creation time at second resolution
/// (e.g. `20240315_142501`), so lexical order equals creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id for a session created at `at`.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.format(SESSION_ID_FORMAT).to_string())
    }

    /// Disambiguate an id that collides with an existing session
    /// created within the same second. The suffix is zero-padded so
    /// lexical order stays creation order.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{n:03}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message within a chat session.
///
/// Content is stored as typed or generated; escaping happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// One named conversation with its ordered message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    /// Set once, from the first user message.
    pub title: Option<String>,
    /// Conversation order; append-only.
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    /// Last time a user submitted a message in this session.
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Messages that are shown on screen (everything but the persona).
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
    }

    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.display_title().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            message_count: self.visible_messages().count() as u32,
        }
    }
}

/// Sidebar entry for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of visible (non-system) messages.
    pub message_count: u32,
}

/// State of the in-flight turn in the conversation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingResponse,
    Streaming,
    Complete,
    Failed,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Idle => write!(f, "idle"),
            TurnState::AwaitingResponse => write!(f, "awaiting_response"),
            TurnState::Streaming => write!(f, "streaming"),
            TurnState::Complete => write!(f, "complete"),
            TurnState::Failed => write!(f, "failed"),
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState::Idle
    }
}
