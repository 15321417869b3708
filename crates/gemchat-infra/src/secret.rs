//! Startup credential lookup from the environment.
//!
//! Read once at startup to pre-configure the credential holder. Nothing is
//! ever written back: the value lives only in process memory.

use secrecy::SecretString;

/// Read the credential from the environment variable `key`.
///
/// Unset, empty, and non-Unicode values are all treated as absent.
pub fn credential_from_env(key: &str) -> Option<SecretString> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        // Present but not valid Unicode; a key must be a valid string
        Err(std::env::VarError::NotUnicode(_)) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_env_credential_present() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("GEMCHAT_TEST_KEY_PRESENT", "AIza-test-value") };

        let secret = credential_from_env("GEMCHAT_TEST_KEY_PRESENT").unwrap();
        assert_eq!(secret.expose_secret(), "AIza-test-value");

        unsafe { std::env::remove_var("GEMCHAT_TEST_KEY_PRESENT") };
    }

    #[test]
    fn test_env_credential_missing() {
        assert!(credential_from_env("GEMCHAT_TEST_KEY_DEFINITELY_UNSET").is_none());
    }

    #[test]
    fn test_env_credential_empty_is_absent() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("GEMCHAT_TEST_KEY_EMPTY", "  ") };

        assert!(credential_from_env("GEMCHAT_TEST_KEY_EMPTY").is_none());

        unsafe { std::env::remove_var("GEMCHAT_TEST_KEY_EMPTY") };
    }
}
