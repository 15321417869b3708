//! GeminiProvider -- concrete [`ModelGateway`] implementation for Google Gemini.
//!
//! Sends requests to `models/{model}:streamGenerateContent?alt=sse` with the
//! key in the `x-goog-api-key` header, never in the URL, so request URLs
//! are safe to log.

use secrecy::{ExposeSecret, SecretString};

use gemchat_core::llm::gateway::{EventStream, ModelGateway};
use gemchat_types::llm::{CompletionRequest, MessageRole};

use super::streaming::create_gemini_stream;
use super::types::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest};

/// Google Gemini model gateway.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a provider sharing an existing HTTP client.
    pub fn new(client: reqwest::Client, api_key: SecretString, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Streaming endpoint for `model`.
    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:streamGenerateContent?alt=sse",
            self.base_url
        )
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    ///
    /// Prior turns map `assistant` to `model`; system messages are not
    /// representable as contents and are dropped. The prompt is always the
    /// final user turn.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                    MessageRole::System => return None,
                };
                Some(GeminiContent {
                    role: role.to_string(),
                    parts: vec![GeminiPart {
                        text: m.content.clone(),
                    }],
                })
            })
            .collect();

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: request.prompt.clone(),
            }],
        });

        GeminiRequest {
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: request.generation.temperature,
                max_output_tokens: request.generation.max_output_tokens,
            },
            safety_settings: request.safety_settings.clone(),
        }
    }
}

// GeminiProvider intentionally does NOT derive Debug.

impl ModelGateway for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        let body = Self::to_gemini_request(&request);
        let url = self.url(&request.model);
        let api_key = SecretString::from(self.api_key.expose_secret().to_owned());

        create_gemini_stream(&self.client, &url, body, api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_types::llm::{Message, ModelSettings};

    fn make_provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(
            reqwest::Client::new(),
            SecretString::from("test-key".to_string()),
            base_url,
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider(GeminiProvider::DEFAULT_BASE_URL).name(), "gemini");
    }

    #[test]
    fn test_url_construction() {
        let provider = make_provider("https://generativelanguage.googleapis.com/");
        assert_eq!(
            provider.url("gemini-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn test_url_never_contains_key() {
        let provider = make_provider(GeminiProvider::DEFAULT_BASE_URL);
        assert!(!provider.url("gemini-pro").contains("test-key"));
    }

    #[test]
    fn test_single_turn_request_body() {
        let request = CompletionRequest::single_turn(&ModelSettings::default(), "Hello");
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_history_roles_mapped() {
        let mut request = CompletionRequest::single_turn(&ModelSettings::default(), "third");
        request.history = vec![
            Message {
                role: MessageRole::System,
                content: "persona".to_string(),
            },
            Message {
                role: MessageRole::User,
                content: "first".to_string(),
            },
            Message {
                role: MessageRole::Assistant,
                content: "second".to_string(),
            },
        ];
        let gemini = GeminiProvider::to_gemini_request(&request);
        let roles: Vec<_> = gemini.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(gemini.contents[2].parts[0].text, "third");
    }
}
