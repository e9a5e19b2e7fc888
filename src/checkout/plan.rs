use crate::config::Config;
use crate::scoring::{check_answers, score_answers, ScoreResult};

use super::idempotency::idempotency_key;
use super::metadata::{payment_intent_metadata, session_metadata, Metadata};
use super::request::{is_valid_email, normalize_email, CheckoutError, CheckoutRequest};

/// Price of the result unlock, in cents
pub const RESULT_PRICE_CENTS: u64 = 100;

/// Price of the PDF report order bump, in cents
pub const BUMP_PRICE_CENTS: u64 = 700;

const CURRENCY: &str = "usd";

/// One purchasable line on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItem {
    /// A catalog price configured in the payment dashboard
    Price { price: String, quantity: u32 },
    /// Ad-hoc price data, used when no catalog price id is configured
    Inline {
        currency: String,
        unit_amount: u64,
        name: String,
        description: String,
        quantity: u32,
    },
}

impl LineItem {
    fn result_unlock(price_id: Option<&str>) -> Self {
        match price_id {
            Some(price) => LineItem::Price {
                price: price.to_string(),
                quantity: 1,
            },
            None => LineItem::Inline {
                currency: CURRENCY.to_string(),
                unit_amount: RESULT_PRICE_CENTS,
                name: "IQ Snapshot Result".to_string(),
                description: "Personalized IQ score, percentile, and interpretation".to_string(),
                quantity: 1,
            },
        }
    }

    fn pdf_report(price_id: Option<&str>) -> Self {
        match price_id {
            Some(price) => LineItem::Price {
                price: price.to_string(),
                quantity: 1,
            },
            None => LineItem::Inline {
                currency: CURRENCY.to_string(),
                unit_amount: BUMP_PRICE_CENTS,
                name: "Personalized PDF Report".to_string(),
                description: "Detailed breakdown with charts and actionable insights".to_string(),
                quantity: 1,
            },
        }
    }
}

/// Everything needed to open a payment session for a validated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPlan {
    pub email: String,
    pub score: ScoreResult,
    pub bump: bool,
    pub idempotency_key: String,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub session_metadata: Metadata,
    pub payment_intent_metadata: Metadata,
}

/// Validate a submission and build its checkout plan.
///
/// This is the boundary where the strict answer gate runs: an answer set that
/// fails validation is rejected here and never scored.
pub fn prepare_checkout(
    request: &CheckoutRequest,
    config: &Config,
) -> Result<CheckoutPlan, CheckoutError> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(CheckoutError::InvalidEmail);
    }

    check_answers(&request.answers).map_err(CheckoutError::InvalidAnswers)?;

    let score = score_answers(&request.answers);

    let mut line_items = vec![LineItem::result_unlock(config.stripe.price_id.as_deref())];
    if request.bump {
        line_items.push(LineItem::pdf_report(config.stripe.bump_price_id.as_deref()));
    }

    let site = config.site_base();

    Ok(CheckoutPlan {
        idempotency_key: idempotency_key(&email, &request.answers, request.bump),
        session_metadata: session_metadata(&email, &score, request.bump),
        payment_intent_metadata: payment_intent_metadata(
            &email,
            &score,
            request.bump,
            &config.variants,
        ),
        success_url: format!("{}/results?session_id={{CHECKOUT_SESSION_ID}}", site),
        cancel_url: format!("{}/test", site),
        line_items,
        email,
        score,
        bump: request.bump,
    })
}
