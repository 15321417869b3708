//! Application configuration types for gemchat.
//!
//! `AppConfig` represents the `config.toml` that controls the model,
//! its fixed generation settings, the persona, and the HTTP listener.
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::llm::{default_safety_settings, GenerationConfig, ModelSettings, SafetySetting};

/// Default persona instruction seeded as the first message of every session.
pub const DEFAULT_PERSONA: &str = "You are Ayush, a helpful and friendly AI assistant. \
You are knowledgeable and aim to provide accurate, helpful responses while maintaining \
a conversational tone.";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model identifier sent to the gateway.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_safety_settings")]
    pub safety_settings: Vec<SafetySetting>,

    /// Base URL of the generative-language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name the assistant goes by in the page.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Hidden persona instruction.
    #[serde(default = "default_persona")]
    pub persona: String,

    #[serde(default = "default_page_title")]
    pub page_title: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment variable consulted once at startup for a credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f64 {
    GenerationConfig::default().temperature
}

fn default_max_output_tokens() -> u32 {
    GenerationConfig::default().max_output_tokens
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_assistant_name() -> String {
    "Ayush".to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_page_title() -> String {
    "Generative Model".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            safety_settings: default_safety_settings(),
            base_url: default_base_url(),
            assistant_name: default_assistant_name(),
            persona: default_persona(),
            page_title: default_page_title(),
            host: default_host(),
            port: default_port(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AppConfig {
    /// The fixed settings applied to every gateway call.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.model.clone(),
            generation: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
            safety_settings: self.safety_settings.clone(),
        }
    }

    /// `host:port` listener address.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{HarmBlockThreshold, HarmCategory};

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.max_output_tokens, 2048);
        assert_eq!(config.safety_settings.len(), 4);
        assert_eq!(config.listen_addr(), "127.0.0.1:8501");
        assert!(config.persona.starts_with("You are Ayush"));
    }

    #[test]
    fn test_app_config_deserialize_with_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, "gemini-pro");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.assistant_name, "Ayush");
        assert_eq!(config.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
model = "gemini-1.5-flash"
temperature = 0.2
port = 9000

[[safety_settings]]
category = "HARM_CATEGORY_HARASSMENT"
threshold = "BLOCK_ONLY_HIGH"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.port, 9000);
        assert_eq!(config.safety_settings.len(), 1);
        assert_eq!(config.safety_settings[0].category, HarmCategory::Harassment);
        assert_eq!(
            config.safety_settings[0].threshold,
            HarmBlockThreshold::BlockOnlyHigh
        );
    }

    #[test]
    fn test_model_settings_follow_config() {
        let config = AppConfig {
            temperature: 0.3,
            max_output_tokens: 512,
            ..AppConfig::default()
        };
        let settings = config.model_settings();
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.generation.max_output_tokens, 512);
        assert!((settings.generation.temperature - 0.3).abs() < f64::EPSILON);
    }
}
