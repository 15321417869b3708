//! Automatic session titles.
//!
//! A session is named after its first user message, cut to
//! [`TITLE_MAX_CHARS`] characters with [`TRUNCATION_MARKER`] appended when
//! the message is longer.

/// Maximum number of characters kept from the source message.
pub const TITLE_MAX_CHARS: usize = 40;

/// Appended when the source message was truncated.
pub const TRUNCATION_MARKER: &str = "...";

/// Derive a session title from a user message.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn title_from_prompt(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_is_copied() {
        assert_eq!(title_from_prompt("Hello"), "Hello");
    }

    #[test]
    fn test_exactly_forty_chars_not_truncated() {
        let prompt = "a".repeat(40);
        assert_eq!(title_from_prompt(&prompt), prompt);
    }

    #[test]
    fn test_fifty_chars_truncated_with_marker() {
        let prompt = "abcdefghij".repeat(5);
        let title = title_from_prompt(&prompt);
        assert_eq!(title, format!("{}...", &prompt[..40]));
        assert_eq!(title.chars().count(), 43);
    }

    #[test]
    fn test_multibyte_truncation_on_char_boundary() {
        let prompt = "é".repeat(45);
        let title = title_from_prompt(&prompt);
        assert_eq!(title, format!("{}...", "é".repeat(40)));
    }
}
