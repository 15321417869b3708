//! Model gateway request/response types for gemchat.
//!
//! These types model the data shapes exchanged with the hosted generative
//! model: completion requests with their fixed generation and safety
//! settings, streaming events, and gateway errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single prior turn sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }
}

/// Content-safety category understood by the model API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

/// Probability threshold at which a category blocks content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

/// One category -> threshold pair of the content-safety policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// The default policy: all four categories blocked at medium and above.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::DangerousContent,
        HarmCategory::HateSpeech,
        HarmCategory::Harassment,
        HarmCategory::SexuallyExplicit,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    })
    .collect()
}

/// Fixed model configuration applied to every gateway call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub generation: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            generation: GenerationConfig::default(),
            safety_settings: default_safety_settings(),
        }
    }
}

/// Request to the model gateway for a streamed completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    /// Prior turns. Each call starts a fresh gateway-side context.
    pub history: Vec<Message>,
    pub prompt: String,
    pub generation: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl CompletionRequest {
    /// Build a single-prompt request with no prior history.
    pub fn single_turn(settings: &ModelSettings, prompt: impl Into<String>) -> Self {
        Self {
            model: settings.model.clone(),
            history: Vec::new(),
            prompt: prompt.into(),
            generation: settings.generation.clone(),
            safety_settings: settings.safety_settings.clone(),
        }
    }
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the gateway.
    Connected,

    /// An incremental piece of response text.
    TextDelta { text: String },

    /// The model reported why it stopped generating.
    Finished { reason: String },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Errors from model gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("response blocked: {0}")]
    ContentBlocked(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Whether the gateway rejected the configured credential.
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self, LlmError::AuthenticationFailed(_))
    }
}
