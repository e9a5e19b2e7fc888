use http::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::quiz::AnswerSet;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Body of a checkout submission from the quiz page.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub email: String,
    pub answers: AnswerSet,
    /// Add the PDF report order bump
    #[serde(default)]
    pub bump: bool,
}

/// Reasons a checkout submission is refused before any payment call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Valid email is required")]
    InvalidEmail,
    #[error("Incomplete or invalid answers")]
    InvalidAnswers(Vec<String>),
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::InvalidEmail | CheckoutError::InvalidAnswers(_) => {
                StatusCode::BAD_REQUEST
            }
            CheckoutError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// Lowercase and trim an email address
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Loose shape check: something@something.something, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jo@Example.COM \n"), "jo@example.com");
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("jo@example.com"));
        assert!(is_valid_email("a.b+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jo"));
        assert!(!is_valid_email("jo@example"));
        assert!(!is_valid_email("jo @example.com"));
        assert!(!is_valid_email("jo@@example.com"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::InvalidEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CheckoutError::InvalidAnswers(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CheckoutError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_request_bump_defaults_false() {
        let req: CheckoutRequest =
            serde_json::from_str(r#"{"email": "jo@example.com", "answers": {"q1": "1"}}"#)
                .unwrap();
        assert!(!req.bump);
        assert_eq!(req.answers["q1"], "1");
    }
}
