//! Conversation controller: one request/response turn.
//!
//! A turn moves `Idle -> AwaitingResponse -> Streaming -> Complete`, or to
//! `Failed` from any state when the gateway errors. The user message is
//! stored before any network activity; the assistant message is stored
//! once the stream ends. Every gateway failure is terminal for the turn
//! only: it is converted into an apology message plus a diagnostic
//! notice, and the session stays usable.
//!
//! Progress is reported through a caller-supplied callback so the
//! controller can be driven without any UI harness.

use chrono::Utc;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use gemchat_types::chat::{ChatMessage, SessionId, TurnState};
use gemchat_types::error::ChatError;
use gemchat_types::llm::{CompletionRequest, LlmError, ModelSettings, StreamEvent};

use crate::llm::gateway::ModelGateway;
use crate::render::FALLBACK_APOLOGY;

use super::store::SessionStore;

/// Stored as the assistant's turn when the gateway fails.
pub const ERROR_APOLOGY: &str =
    "I apologize, but I encountered an error processing your request.";

/// Diagnostic shown to the user next to a failed turn. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    /// The gateway rejected the credential; the user should re-enter it.
    pub credential_rejected: bool,
}

impl Notice {
    fn from_error(err: &LlmError) -> Self {
        Self {
            message: format!("Error: {err}"),
            credential_rejected: err.is_credential_rejected(),
        }
    }
}

/// Progress of a turn, in the order it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnUpdate {
    /// The turn is bound to this session.
    Session { session_id: SessionId, title: String },
    /// The user's message was stored.
    UserMessage(ChatMessage),
    State(TurnState),
    /// Accumulated raw assistant text so far.
    Partial { content: String },
    Notice(Notice),
    /// The assistant's final message was stored.
    AssistantMessage(ChatMessage),
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Empty submission: nothing happened.
    Ignored,
    Complete {
        session_id: SessionId,
        message: ChatMessage,
    },
    Failed {
        session_id: SessionId,
        message: ChatMessage,
        notice: Notice,
    },
}

impl TurnOutcome {
    pub fn state(&self) -> TurnState {
        match self {
            TurnOutcome::Ignored => TurnState::Idle,
            TurnOutcome::Complete { .. } => TurnState::Complete,
            TurnOutcome::Failed { .. } => TurnState::Failed,
        }
    }

    pub fn assistant_message(&self) -> Option<&ChatMessage> {
        match self {
            TurnOutcome::Ignored => None,
            TurnOutcome::Complete { message, .. } | TurnOutcome::Failed { message, .. } => {
                Some(message)
            }
        }
    }
}

/// Drives turns against a model gateway with fixed model settings.
#[derive(Debug, Clone)]
pub struct ConversationController {
    settings: ModelSettings,
}

impl ConversationController {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }

    /// Run one turn for `prompt` in the current session.
    ///
    /// Creates a session first if none is current. Only the latest prompt
    /// is sent to the gateway; earlier turns of the session are not.
    ///
    /// # Errors
    ///
    /// Only store inconsistencies surface as `Err`; gateway failures are
    /// reported as [`TurnOutcome::Failed`].
    #[tracing::instrument(
        name = "conversation_turn",
        skip_all,
        fields(model = %self.settings.model, gateway = gateway.name())
    )]
    pub async fn submit<G, F>(
        &self,
        sessions: &mut SessionStore,
        gateway: &G,
        prompt: &str,
        mut on_update: F,
    ) -> Result<TurnOutcome, ChatError>
    where
        G: ModelGateway + ?Sized,
        F: FnMut(TurnUpdate),
    {
        if prompt.trim().is_empty() {
            debug!("Ignoring empty submission");
            return Ok(TurnOutcome::Ignored);
        }

        let session_id = match sessions.current_id() {
            Some(id) => id.clone(),
            None => sessions.create_session(),
        };

        // Idle -> AwaitingResponse: store the user message before any network activity.
        let user_message = ChatMessage::user(prompt);
        sessions.append_message(&session_id, user_message.clone())?;
        sessions.set_title_from_first_user_message(&session_id, prompt)?;
        sessions.touch(&session_id, Utc::now())?;

        let title = sessions
            .get(&session_id)
            .map(|s| s.display_title().to_string())
            .ok_or_else(|| ChatError::SessionNotFound(session_id.clone()))?;

        on_update(TurnUpdate::Session {
            session_id: session_id.clone(),
            title,
        });
        on_update(TurnUpdate::UserMessage(user_message));
        on_update(TurnUpdate::State(TurnState::AwaitingResponse));

        let request = CompletionRequest::single_turn(&self.settings, prompt);
        let mut stream = gateway.stream(request);

        let mut buffer = String::new();
        let mut streaming = false;
        let mut failure: Option<LlmError> = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Connected) => {
                    if !streaming {
                        streaming = true;
                        on_update(TurnUpdate::State(TurnState::Streaming));
                    }
                }
                Ok(StreamEvent::TextDelta { text }) => {
                    if !streaming {
                        streaming = true;
                        on_update(TurnUpdate::State(TurnState::Streaming));
                    }
                    if text.is_empty() {
                        continue;
                    }
                    buffer.push_str(&text);
                    on_update(TurnUpdate::Partial {
                        content: buffer.clone(),
                    });
                }
                Ok(StreamEvent::Finished { reason }) => {
                    debug!(finish_reason = %reason, "Model finished");
                }
                Ok(StreamEvent::Usage(usage)) => {
                    debug!(
                        prompt_tokens = usage.prompt_tokens,
                        output_tokens = usage.output_tokens,
                        "Token usage"
                    );
                }
                Ok(StreamEvent::Done) => break,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        match failure {
            None => {
                let content = if buffer.is_empty() {
                    FALLBACK_APOLOGY.to_string()
                } else {
                    buffer
                };
                let message = ChatMessage::assistant(content);
                sessions.append_message(&session_id, message.clone())?;

                info!(session_id = %session_id, "Turn complete");
                on_update(TurnUpdate::AssistantMessage(message.clone()));
                on_update(TurnUpdate::State(TurnState::Complete));

                Ok(TurnOutcome::Complete {
                    session_id,
                    message,
                })
            }
            Some(err) => {
                warn!(session_id = %session_id, error = %err, "Model gateway failed");

                let message = ChatMessage::assistant(ERROR_APOLOGY);
                sessions.append_message(&session_id, message.clone())?;

                let notice = Notice::from_error(&err);
                on_update(TurnUpdate::Notice(notice.clone()));
                on_update(TurnUpdate::AssistantMessage(message.clone()));
                on_update(TurnUpdate::State(TurnState::Failed));

                Ok(TurnOutcome::Failed {
                    session_id,
                    message,
                    notice,
                })
            }
        }
    }
}
