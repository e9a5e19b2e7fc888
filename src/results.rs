use http::StatusCode;
use thiserror::Error;

use crate::checkout::{MetadataError, ResultMetadata};
use crate::stripe::{CheckoutSession, StripeClient};

const SESSION_ID_PREFIX: &str = "cs_";

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("Invalid session ID")]
    InvalidSessionId,
    #[error("Payment not completed")]
    PaymentRequired,
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Api(#[from] anyhow::Error),
}

impl ResultsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResultsError::InvalidSessionId => StatusCode::BAD_REQUEST,
            ResultsError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            ResultsError::Metadata(e) => e.status_code(),
            ResultsError::Api(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn check_session_id(session_id: &str) -> Result<(), ResultsError> {
    if session_id.starts_with(SESSION_ID_PREFIX) {
        Ok(())
    } else {
        Err(ResultsError::InvalidSessionId)
    }
}

/// Read the result out of a retrieved session. Unpaid sessions never reveal it.
pub fn paid_result(session: &CheckoutSession) -> Result<ResultMetadata, ResultsError> {
    if !session.is_paid() {
        return Err(ResultsError::PaymentRequired);
    }
    Ok(ResultMetadata::from_metadata(session.result_metadata())?)
}

/// Look up the paid result for a checkout session.
pub async fn fetch_paid_result(
    client: &StripeClient,
    session_id: &str,
) -> Result<ResultMetadata, ResultsError> {
    check_session_id(session_id)?;
    let session = client.retrieve_session(session_id).await?;
    let result = paid_result(&session);
    if let Err(ResultsError::PaymentRequired) = &result {
        log::warn!("Result requested for unpaid session {}", session_id);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::payment_intent_metadata;
    use crate::config::VariantConfig;
    use crate::scoring::ScoreResult;
    use crate::stripe::{Expandable, PaymentIntent};

    fn session(status: &str, with_result: bool) -> CheckoutSession {
        let metadata = if with_result {
            payment_intent_metadata(
                "jo@example.com",
                &ScoreResult::from_raw(18),
                false,
                &VariantConfig::default(),
            )
        } else {
            Default::default()
        };
        CheckoutSession {
            id: "cs_test_1".to_string(),
            url: None,
            payment_status: status.to_string(),
            metadata: Default::default(),
            payment_intent: Some(Expandable::Object(PaymentIntent {
                id: "pi_1".to_string(),
                metadata,
            })),
        }
    }

    #[test]
    fn test_session_id_prefix() {
        assert!(check_session_id("cs_test_abc").is_ok());
        let err = check_session_id("pi_123").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidSessionId));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(check_session_id("").is_err());
    }

    #[test]
    fn test_paid_session_returns_result() {
        let result = paid_result(&session("paid", true)).unwrap();
        let expected = ScoreResult::from_raw(18);
        assert_eq!(result.iq_score, expected.iq_score);
        assert_eq!(result.band, expected.band);
        assert_eq!(result.email.as_deref(), Some("jo@example.com"));
    }

    #[test]
    fn test_unpaid_session_is_payment_required() {
        let err = paid_result(&session("unpaid", true)).unwrap_err();
        assert!(matches!(err, ResultsError::PaymentRequired));
        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_paid_session_without_metadata_is_not_found() {
        let err = paid_result(&session("paid", false)).unwrap_err();
        assert!(matches!(err, ResultsError::Metadata(MetadataError::NotFound)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_id_without_network() {
        let client = StripeClient::new("sk_test").with_base_url("http://127.0.0.1:9");
        let err = fetch_paid_result(&client, "not-a-session").await.unwrap_err();
        assert!(matches!(err, ResultsError::InvalidSessionId));
    }
}
