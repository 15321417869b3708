//! The single chat page.
//!
//! GET / serves `assets/index.html` with the configured page title and
//! assistant name filled in.

use axum::extract::State;
use axum::response::Html;

use gemchat_core::render::escape_markup;
use gemchat_types::config::AppConfig;

use crate::state::AppState;

const PAGE_TEMPLATE: &str = include_str!("../../../assets/index.html");

/// Fill the page template from configuration.
pub fn render_page(config: &AppConfig) -> String {
    PAGE_TEMPLATE
        .replace("{{PAGE_TITLE}}", &escape_markup(&config.page_title))
        .replace("{{ASSISTANT_NAME}}", &escape_markup(&config.assistant_name))
}

/// GET / - The chat page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_uses_configured_names() {
        let config = AppConfig {
            page_title: "Test Model".to_string(),
            assistant_name: "Nova".to_string(),
            ..AppConfig::default()
        };
        let page = render_page(&config);
        assert!(page.contains("<title>🤖 Test Model</title>"));
        assert!(page.contains("Powered by Nova AI"));
        assert!(page.contains("Message Nova..."));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_page_escapes_configured_names() {
        let config = AppConfig {
            assistant_name: "<script>".to_string(),
            ..AppConfig::default()
        };
        let page = render_page(&config);
        assert!(page.contains("Powered by &lt;script&gt; AI"));
    }

    #[test]
    fn test_default_footer() {
        assert!(render_page(&AppConfig::default()).contains("Powered by Ayush AI"));
    }
}
