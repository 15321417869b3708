//! Message rendering for the chat page.
//!
//! Turns a role and text body into a [`DisplayUnit`]: a markup fragment the
//! page embeds verbatim. Stored text is raw; it is escaped exactly once here
//! so model output (or user input) can never inject markup. During streaming the
//! provisional unit carries a cursor marker that the final unit drops.

use serde::Serialize;

use gemchat_types::chat::{ChatSession, MessageRole};

/// Shown when the model produced no text.
pub const FALLBACK_APOLOGY: &str = "I apologize, but I cannot generate that type of content.";

/// Appended to the in-progress assistant text while the stream is open.
pub const STREAMING_CURSOR: &str = "▌";

/// Escape `&`, `<` and `>` to their entity forms.
///
/// `&` goes first so existing entity text survives a round trip.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Inverse of [`escape_markup`]. `&amp;` is resolved last.
pub fn unescape_markup(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Clean a piece of model output for display.
///
/// Empty text becomes [`FALLBACK_APOLOGY`].
pub fn sanitize_model_output(text: &str) -> String {
    if text.is_empty() {
        return FALLBACK_APOLOGY.to_string();
    }
    escape_markup(text)
}

/// A rendered message, ready to hand to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUnit {
    pub role: MessageRole,
    pub avatar: &'static str,
    pub html: String,
    /// True while the assistant's message is still streaming.
    pub provisional: bool,
}

fn avatar(role: &MessageRole) -> &'static str {
    match role {
        MessageRole::User => "👤",
        MessageRole::Assistant => "🤖",
        MessageRole::System => "⚙️",
    }
}

fn message_markup(role: &MessageRole, body: &str, cursor: &str) -> String {
    format!(
        "<div class=\"message-row {role}\"><div class=\"message-content\">\
<div class=\"avatar\">{avatar}</div><div class=\"text\">{body}{cursor}</div>\
</div></div>",
        avatar = avatar(role),
    )
}

/// Render a complete message.
///
/// Assistant text goes through [`sanitize_model_output`]; everything else is
/// only escaped.
pub fn render(role: &MessageRole, content: &str) -> DisplayUnit {
    let body = match role {
        MessageRole::Assistant => sanitize_model_output(content),
        MessageRole::User | MessageRole::System => escape_markup(content),
    };
    DisplayUnit {
        role: role.clone(),
        avatar: avatar(role),
        html: message_markup(role, &body, ""),
        provisional: false,
    }
}

/// Render the in-progress assistant message with the streaming cursor.
pub fn render_provisional(content: &str) -> DisplayUnit {
    let role = MessageRole::Assistant;
    DisplayUnit {
        avatar: avatar(&role),
        html: message_markup(&role, &escape_markup(content), STREAMING_CURSOR),
        role,
        provisional: true,
    }
}

/// Render the on-screen transcript of a session (persona excluded).
pub fn render_session(session: &ChatSession) -> Vec<DisplayUnit> {
    session
        .visible_messages()
        .map(|m| render(&m.role, &m.content))
        .collect()
}
