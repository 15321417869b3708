//! API credential endpoints.
//!
//! Endpoints:
//! - GET /api/v1/credential - Whether a credential is set, and its fingerprint
//! - PUT /api/v1/credential - Set or replace the credential
//!
//! The credential itself is never echoed back.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for setting the credential.
#[derive(Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatus {
    pub configured: bool,
    /// First 8 hex characters of the credential's SHA-256 digest.
    pub fingerprint: Option<String>,
}

/// GET /api/v1/credential
pub async fn get_credential(
    State(state): State<AppState>,
) -> Json<ApiResponse<CredentialStatus>> {
    let timer = RequestTimer::start();
    let chat = state.chat.lock().await;

    let status = CredentialStatus {
        configured: chat.credential.is_configured(),
        fingerprint: chat.credential.fingerprint().map(str::to_string),
    };

    Json(timer.finish(status))
}

/// PUT /api/v1/credential
///
/// Surrounding whitespace is stripped; an empty key is rejected with 400.
pub async fn set_credential(
    State(state): State<AppState>,
    Json(body): Json<SetCredentialRequest>,
) -> Result<Json<ApiResponse<CredentialStatus>>, AppError> {
    let timer = RequestTimer::start();
    let mut chat = state.chat.lock().await;

    let fingerprint = chat.credential.set_credential(&body.api_key)?.to_string();

    let status = CredentialStatus {
        configured: true,
        fingerprint: Some(fingerprint),
    };

    Ok(Json(timer.finish(status).with_link("self", "/api/v1/credential")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_types::config::AppConfig;
    use gemchat_types::error::ChatError;

    fn state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_by_default() {
        let Json(resp) = get_credential(State(state())).await;
        let status = resp.data.unwrap();
        assert!(!status.configured);
        assert!(status.fingerprint.is_none());
    }

    #[tokio::test]
    async fn test_set_credential_returns_fingerprint_only() {
        let state = state();
        let Json(resp) = set_credential(
            State(state.clone()),
            Json(SetCredentialRequest {
                api_key: "  abc \n".to_string(),
            }),
        )
        .await
        .unwrap();

        // SHA-256("abc") starts with ba7816bf
        assert_eq!(resp.data.unwrap().fingerprint.as_deref(), Some("ba7816bf"));

        let Json(resp) = get_credential(State(state)).await;
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("ba7816bf"));
        assert!(!json.contains("\"abc\""));
    }

    #[tokio::test]
    async fn test_empty_credential_rejected() {
        let err = set_credential(
            State(state()),
            Json(SetCredentialRequest {
                api_key: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::EmptyCredential)));
    }
}
