//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! Runs one conversation turn in the current session (creating one if
//! needed) and streams its progress as Server-Sent Events. The chat state
//! lock is held by the turn from start to finish, so only one turn runs at
//! a time and session switches wait for it. If the client disconnects the
//! turn still runs to completion, so the transcript stays consistent.
//!
//! SSE event types:
//! - `session`   — `{ "session_id": "...", "title": "..." }`
//! - `user`      — rendered user message
//! - `state`     — `{ "state": "awaiting_response" | "streaming" | ... }`
//! - `partial`   — rendered assistant text so far, with the streaming cursor
//! - `assistant` — final rendered assistant message
//! - `notice`    — `{ "message": "...", "credential_rejected": bool }` (not stored)
//! - `done`      — `{ "state": "complete" | "failed" }`
//! - `ignored`   — empty submission, nothing happened
//! - `error`     — `{ "message": "..." }` for session store failures

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::Stream;

use gemchat_core::chat::controller::{TurnOutcome, TurnUpdate};
use gemchat_core::render::{render, render_provisional};
use gemchat_types::chat::TurnState;
use gemchat_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamChatRequest {
    /// The user message to send.
    pub message: String,
}

/// Everything the turn task reports to the SSE side.
#[derive(Debug)]
enum TurnSignal {
    Update(TurnUpdate),
    Finished(TurnState),
    Ignored,
    Error(String),
}

/// SSE event name and JSON payload for a signal.
fn signal_payload(signal: TurnSignal) -> (&'static str, Value) {
    match signal {
        TurnSignal::Update(TurnUpdate::Session { session_id, title }) => (
            "session",
            json!({ "session_id": session_id, "title": title }),
        ),
        TurnSignal::Update(TurnUpdate::UserMessage(message)) => {
            ("user", to_value(render(&message.role, &message.content)))
        }
        TurnSignal::Update(TurnUpdate::State(state)) => ("state", json!({ "state": state })),
        TurnSignal::Update(TurnUpdate::Partial { content }) => {
            ("partial", to_value(render_provisional(&content)))
        }
        TurnSignal::Update(TurnUpdate::AssistantMessage(message)) => {
            ("assistant", to_value(render(&message.role, &message.content)))
        }
        TurnSignal::Update(TurnUpdate::Notice(notice)) => ("notice", to_value(notice)),
        TurnSignal::Finished(state) => ("done", json!({ "state": state })),
        TurnSignal::Ignored => ("ignored", json!({})),
        TurnSignal::Error(message) => ("error", json!({ "message": message })),
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// POST /api/v1/chat/stream — one turn as SSE.
///
/// Returns 401 `CREDENTIAL_REQUIRED` without contacting the model when no
/// credential is configured.
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(body): Json<StreamChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let mut chat = state.chat.clone().lock_owned().await;

    let secret = chat.credential.secret().ok_or(ChatError::NotConfigured)?;
    let gateway = state.gateway(secret);
    let controller = state.controller.clone();

    let (tx, mut rx) = mpsc::unbounded_channel::<TurnSignal>();

    tokio::spawn(async move {
        let updates = tx.clone();
        let outcome = controller
            .submit(&mut chat.sessions, &gateway, &body.message, |update| {
                // A closed channel means the client went away; the turn still completes.
                let _ = updates.send(TurnSignal::Update(update));
            })
            .await;

        let last = match outcome {
            Ok(TurnOutcome::Ignored) => TurnSignal::Ignored,
            Ok(outcome) => TurnSignal::Finished(outcome.state()),
            Err(e) => {
                tracing::error!(error = %e, "Turn aborted");
                TurnSignal::Error(e.to_string())
            }
        };
        let _ = tx.send(last);
        // `chat` (the state lock) is released here.
    });

    let sse_stream = async_stream::stream! {
        while let Some(signal) = rx.recv().await {
            let (name, data) = signal_payload(signal);
            yield Ok::<_, Infallible>(Event::default().event(name).data(data.to_string()));
        }
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    use gemchat_core::chat::controller::{Notice, ERROR_APOLOGY};
    use gemchat_types::chat::{ChatMessage, SessionId};
    use gemchat_types::config::AppConfig;

    #[test]
    fn test_session_payload() {
        let (name, data) = signal_payload(TurnSignal::Update(TurnUpdate::Session {
            session_id: SessionId::new("20240501_100000"),
            title: "Hello".to_string(),
        }));
        assert_eq!(name, "session");
        assert_eq!(data["session_id"], "20240501_100000");
        assert_eq!(data["title"], "Hello");
    }

    #[test]
    fn test_partial_payload_has_cursor() {
        let (name, data) = signal_payload(TurnSignal::Update(TurnUpdate::Partial {
            content: "Hi".to_string(),
        }));
        assert_eq!(name, "partial");
        assert_eq!(data["provisional"], true);
        assert!(data["html"].as_str().unwrap().contains("Hi▌"));
    }

    #[test]
    fn test_assistant_payload_is_escaped_and_final() {
        let (name, data) = signal_payload(TurnSignal::Update(TurnUpdate::AssistantMessage(
            ChatMessage::assistant("<b>x</b>"),
        )));
        assert_eq!(name, "assistant");
        assert_eq!(data["provisional"], false);
        assert!(!data["html"].as_str().unwrap().contains("<b>"));
    }

    #[test]
    fn test_state_and_done_payloads() {
        let (name, data) =
            signal_payload(TurnSignal::Update(TurnUpdate::State(TurnState::Streaming)));
        assert_eq!(name, "state");
        assert_eq!(data["state"], "streaming");

        let (name, data) = signal_payload(TurnSignal::Finished(TurnState::Failed));
        assert_eq!(name, "done");
        assert_eq!(data["state"], "failed");
    }

    #[test]
    fn test_notice_payload() {
        let (name, data) = signal_payload(TurnSignal::Update(TurnUpdate::Notice(Notice {
            message: "Error: authentication failed".to_string(),
            credential_rejected: true,
        })));
        assert_eq!(name, "notice");
        assert_eq!(data["credential_rejected"], true);
    }

    #[tokio::test]
    async fn test_stream_requires_credential() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let result = stream_chat(
            State(state.clone()),
            Json(StreamChatRequest {
                message: "Hello".to_string(),
            }),
        )
        .await;
        assert!(matches!(
            result,
            Err(AppError::Chat(ChatError::NotConfigured))
        ));
        // Nothing was stored
        assert!(state.chat.lock().await.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_fails_turn_with_apology() {
        let config = AppConfig {
            // Nothing listens on the discard port; the connection is refused.
            base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::default()
        };
        let state = AppState::new(config).unwrap();
        state
            .chat
            .lock()
            .await
            .credential
            .set_credential("test-key")
            .unwrap();

        let sse = stream_chat(
            State(state.clone()),
            Json(StreamChatRequest {
                message: "Hello".to_string(),
            }),
        )
        .await
        .unwrap();
        let body = axum::body::to_bytes(sse.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("event: session"));
        assert!(text.contains("event: notice"));
        assert!(text.contains("event: done"));
        assert!(text.contains("\"failed\""));
        assert!(!text.contains("test-key"));

        let chat = state.chat.lock().await;
        let session = chat.sessions.current_session().unwrap();
        let visible: Vec<_> = session.visible_messages().cloned().collect();
        assert_eq!(
            visible,
            vec![ChatMessage::user("Hello"), ChatMessage::assistant(ERROR_APOLOGY)]
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_ignored() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state
            .chat
            .lock()
            .await
            .credential
            .set_credential("test-key")
            .unwrap();

        let sse = stream_chat(
            State(state.clone()),
            Json(StreamChatRequest {
                message: "   ".to_string(),
            }),
        )
        .await
        .unwrap();
        let body = axum::body::to_bytes(sse.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("event: ignored"));
        assert!(state.chat.lock().await.sessions.is_empty());
    }
}
