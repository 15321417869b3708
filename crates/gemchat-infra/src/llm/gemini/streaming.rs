//! SSE stream creation and chunk mapping for Gemini `streamGenerateContent`.
//!
//! With `alt=sse` the endpoint answers with server-sent events whose
//! `data:` payload is one complete response chunk:
//! 1. Each chunk carries zero or more candidate text parts
//! 2. The last chunk carries `finishReason` and cumulative `usageMetadata`
//! 3. A blocked prompt arrives as `promptFeedback.blockReason` with no candidates
//! 4. The body simply ends after the last chunk (there is no stop event)

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use eventsource_stream::Eventsource;

use gemchat_core::llm::gateway::EventStream;
use gemchat_types::llm::{LlmError, StreamEvent, Usage};

use super::types::{GeminiErrorEnvelope, GeminiRequest, GenerateContentChunk};

/// Finish reasons that mean the candidate was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Map a non-success HTTP status and body to an [`LlmError`].
///
/// The API reports an invalid key as a 400 whose body carries
/// `API_KEY_INVALID`, so that case is checked before the generic 400.
pub fn map_status(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        400 if body.contains("API_KEY_INVALID") => LlmError::AuthenticationFailed(message),
        401 | 403 => LlmError::AuthenticationFailed(message),
        429 => LlmError::RateLimited,
        400 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Map one SSE `data:` payload to gateway events.
///
/// Returns an error when the chunk reports a blocked prompt or response,
/// or an in-stream API error.
pub fn parse_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: GenerateContentChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("stream chunk: {e}")))?;

    if let Some(error) = chunk.error {
        let body = serde_json::json!({ "error": { "message": error.message, "status": error.status } });
        return Err(map_status(error.code, &body.to_string()));
    }

    if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::ContentBlocked(reason));
    }

    let mut events = Vec::new();

    for candidate in &chunk.candidates {
        let text = candidate.text();
        match candidate.finish_reason.as_deref() {
            Some(reason) if text.is_empty() && BLOCKING_FINISH_REASONS.contains(&reason) => {
                return Err(LlmError::ContentBlocked(reason.to_string()));
            }
            _ => {}
        }
        if !text.is_empty() {
            events.push(StreamEvent::TextDelta { text });
        }
        if let Some(reason) = &candidate.finish_reason {
            events.push(StreamEvent::Finished {
                reason: reason.clone(),
            });
        }
    }

    if let Some(usage) = chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage {
            prompt_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }));
    }

    Ok(events)
}

/// Create a streaming SSE connection to `streamGenerateContent`.
///
/// Nothing is sent until the returned stream is first polled. The stream
/// yields `Connected` once the response status is known to be successful,
/// the mapped events of every chunk, and `Done` when the body ends.
///
/// # Arguments
///
/// * `client` - Shared reqwest HTTP client
/// * `url` - Full endpoint URL including `?alt=sse`
/// * `body` - Gemini request body
/// * `api_key` - API key wrapped in SecretString, sent as `x-goog-api-key`
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: SecretString,
) -> EventStream {
    let client = client.clone();
    let url = url.to_string();

    Box::pin(async_stream::try_stream! {
        tracing::debug!(url = %url, "Opening Gemini stream");

        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let response = if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Gemini stream API error response");
            Err::<(), LlmError>(map_status(status.as_u16(), &error_body))?;
            unreachable!()
        } else {
            response
        };

        yield StreamEvent::Connected;

        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(format!("event stream: {e}")))?;
            if event.data.trim().is_empty() {
                continue;
            }
            for stream_event in parse_chunk(&event.data)? {
                yield stream_event;
            }
        }

        yield StreamEvent::Done;
    })
}
