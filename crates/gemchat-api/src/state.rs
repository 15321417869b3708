//! Application state wiring the chat state, controller and gateway client.
//!
//! The core types are generic over the hasher; AppState pins them to the
//! concrete infra implementation.

use std::sync::Arc;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use gemchat_core::chat::controller::ConversationController;
use gemchat_core::state::ChatState;
use gemchat_infra::crypto::hash::Sha256ContentHasher;
use gemchat_infra::llm::gemini::GeminiProvider;
use gemchat_infra::secret::credential_from_env;
use gemchat_types::config::AppConfig;
use gemchat_types::error::ChatError;

pub type ConcreteChatState = ChatState<Sha256ContentHasher>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Credential plus sessions. A turn holds this lock until it ends.
    pub chat: Arc<Mutex<ConcreteChatState>>,
    pub controller: Arc<ConversationController>,
    pub http: reqwest::Client,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the state for `config`. No credential is configured yet.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gemchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let chat = ChatState::new(Sha256ContentHasher::new(), config.persona.clone());
        let controller = ConversationController::new(config.model_settings());

        Ok(Self {
            chat: Arc::new(Mutex::new(chat)),
            controller: Arc::new(controller),
            http,
            config: Arc::new(config),
        })
    }

    /// Pre-configure the credential from the configured environment
    /// variable, if set. Returns the fingerprint when one was applied.
    pub async fn configure_from_env(&self) -> Result<Option<String>, ChatError> {
        let Some(secret) = credential_from_env(&self.config.api_key_env) else {
            return Ok(None);
        };

        let mut chat = self.chat.lock().await;
        let fingerprint = chat.credential.set_credential(secret.expose_secret())?;
        tracing::info!(var = %self.config.api_key_env, "Credential taken from environment");
        Ok(Some(fingerprint.to_string()))
    }

    /// Build a gateway for one turn using `secret`.
    pub fn gateway(&self, secret: &SecretString) -> GeminiProvider {
        GeminiProvider::new(
            self.http.clone(),
            SecretString::from(secret.expose_secret().to_owned()),
            self.config.base_url.clone(),
        )
    }
}
