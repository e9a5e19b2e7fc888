use thiserror::Error;

/// Payment processor API key
pub const STRIPE_SECRET_KEY_VAR: &str = "STRIPE_SECRET_KEY";

/// Signing secret for payment processor webhooks
pub const STRIPE_WEBHOOK_SECRET_VAR: &str = "STRIPE_WEBHOOK_SECRET";

/// Email delivery API key
pub const RESEND_API_KEY_VAR: &str = "RESEND_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
}

/// Read a secret from the environment.
/// Returns Some(value) if the variable is set and non-empty, None otherwise.
pub fn get_secret_from_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Like [`get_secret_from_env`], but a missing secret is an error.
pub fn require_secret(var: &'static str) -> Result<String, CredentialError> {
    get_secret_from_env(var).ok_or(CredentialError::Missing(var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_trimmed() {
        std::env::set_var("IQ_SNAPSHOT_TEST_SECRET_TRIM", "  sk_test_123\n");
        assert_eq!(
            get_secret_from_env("IQ_SNAPSHOT_TEST_SECRET_TRIM"),
            Some("sk_test_123".to_string())
        );
    }

    #[test]
    fn test_blank_secret_is_missing() {
        std::env::set_var("IQ_SNAPSHOT_TEST_SECRET_BLANK", "   ");
        assert_eq!(get_secret_from_env("IQ_SNAPSHOT_TEST_SECRET_BLANK"), None);
        assert_eq!(
            require_secret("IQ_SNAPSHOT_TEST_SECRET_BLANK"),
            Err(CredentialError::Missing("IQ_SNAPSHOT_TEST_SECRET_BLANK"))
        );
    }

    #[test]
    fn test_missing_secret_message() {
        let err = require_secret("IQ_SNAPSHOT_TEST_SECRET_UNSET").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing IQ_SNAPSHOT_TEST_SECRET_UNSET environment variable"
        );
    }
}
