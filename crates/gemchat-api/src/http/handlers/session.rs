//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions             - List sessions, newest first
//! - POST   /api/v1/sessions             - Start a new chat
//! - GET    /api/v1/sessions/current     - The current session, if any
//! - GET    /api/v1/sessions/{id}        - A single session
//! - POST   /api/v1/sessions/{id}/select - Make a session current
//! - DELETE /api/v1/sessions/{id}        - Delete a session (idempotent)
//!
//! Sessions are returned pre-rendered; the persona message is never included.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use gemchat_core::render::{render_session, DisplayUnit};
use gemchat_types::chat::{ChatSession, SessionId, SessionSummary};
use gemchat_types::error::ChatError;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// A session as the page displays it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<DisplayUnit>,
}

impl From<&ChatSession> for SessionView {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id.clone(),
            title: session.display_title().to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            messages: render_session(session),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionList {
    pub current: Option<SessionId>,
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub deleted: bool,
    pub current: Option<SessionId>,
}

fn session_link(id: &SessionId) -> String {
    format!("/api/v1/sessions/{id}")
}

/// GET /api/v1/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<ApiResponse<SessionList>> {
    let timer = RequestTimer::start();
    let chat = state.chat.lock().await;

    let list = SessionList {
        current: chat.sessions.current_id().cloned(),
        sessions: chat.sessions.list_sessions(),
    };

    Json(timer.finish(list).with_link("self", "/api/v1/sessions"))
}

/// POST /api/v1/sessions - New chat.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let timer = RequestTimer::start();
    let mut chat = state.chat.lock().await;

    let id = chat.sessions.create_session();
    let view = chat
        .sessions
        .get(&id)
        .map(SessionView::from)
        .ok_or_else(|| AppError::Internal(format!("session '{id}' vanished after creation")))?;

    Ok(Json(timer.finish(view).with_link("self", &session_link(&id))))
}

/// GET /api/v1/sessions/current
///
/// `data` is `null` when no session is current.
pub async fn current_session(
    State(state): State<AppState>,
) -> Json<ApiResponse<Option<SessionView>>> {
    let timer = RequestTimer::start();
    let chat = state.chat.lock().await;

    let view = chat.sessions.current_session().map(SessionView::from);

    Json(timer.finish(view))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let timer = RequestTimer::start();
    let id = SessionId::new(id);
    let chat = state.chat.lock().await;

    let view = chat
        .sessions
        .get(&id)
        .map(SessionView::from)
        .ok_or_else(|| ChatError::SessionNotFound(id.clone()))?;

    Ok(Json(timer.finish(view).with_link("self", &session_link(&id))))
}

/// POST /api/v1/sessions/{id}/select - Load chat.
pub async fn select_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let timer = RequestTimer::start();
    let id = SessionId::new(id);
    let mut chat = state.chat.lock().await;

    chat.sessions.select_session(&id)?;
    let view = chat
        .sessions
        .current_session()
        .map(SessionView::from)
        .ok_or(ChatError::NoCurrentSession)?;

    Ok(Json(timer.finish(view).with_link("self", &session_link(&id))))
}

/// DELETE /api/v1/sessions/{id}
///
/// Unknown ids succeed with `deleted: false`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<DeleteResult>> {
    let timer = RequestTimer::start();
    let id = SessionId::new(id);
    let mut chat = state.chat.lock().await;

    let result = DeleteResult {
        deleted: chat.sessions.delete_session(&id),
        current: chat.sessions.current_id().cloned(),
    };

    Json(timer.finish(result))
}
