use thiserror::Error;

use crate::chat::SessionId;

/// Errors raised by the session store, credential holder and controller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no API credential configured")]
    NotConfigured,

    #[error("API credential must not be empty")]
    EmptyCredential,

    #[error("session '{0}' not found")]
    SessionNotFound(SessionId),

    #[error("no current session")]
    NoCurrentSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::SessionNotFound(SessionId::new("20240101_120000"));
        assert_eq!(err.to_string(), "session '20240101_120000' not found");
    }

    #[test]
    fn test_not_configured_display() {
        assert_eq!(
            ChatError::NotConfigured.to_string(),
            "no API credential configured"
        );
    }
}
