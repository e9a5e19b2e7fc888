use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::types::{ApiErrorBody, CheckoutSession};
use crate::checkout::{CheckoutPlan, LineItem};

const API_BASE: &str = "https://api.stripe.com/v1";

/// Minimal payment processor client covering hosted checkout sessions
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at another API host (e.g. a local mock)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Create a hosted checkout session for a prepared plan.
    ///
    /// The plan's idempotency key is sent along, so retries and resubmissions
    /// of the same quiz return the original session.
    pub async fn create_checkout_session(&self, plan: &CheckoutPlan) -> Result<CheckoutSession> {
        let url = format!("{}/checkout/sessions", self.base_url);
        let form = checkout_form(plan);

        let http = &self.http;
        let key = self.secret_key.as_str();
        let url = url.as_str();
        let form = form.as_slice();
        let idempotency_key = plan.idempotency_key.as_str();

        let response = Retry::spawn(retry_strategy(), move || async move {
            http.post(url)
                .bearer_auth(key)
                .header("Idempotency-Key", idempotency_key)
                .form(form)
                .send()
                .await
        })
        .await
        .context("Failed to reach Stripe API")?;

        let session: CheckoutSession = parse_response(response).await?;
        log::info!("Created checkout session {} for {}", session.id, plan.email);
        Ok(session)
    }

    /// Fetch a checkout session with its payment intent expanded.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession> {
        let url = format!("{}/checkout/sessions/{}", self.base_url, session_id);

        let http = &self.http;
        let key = self.secret_key.as_str();
        let url = url.as_str();

        let response = Retry::spawn(retry_strategy(), move || async move {
            http.get(url)
                .bearer_auth(key)
                .query(&[("expand[]", "payment_intent")])
                .send()
                .await
        })
        .await
        .context("Failed to reach Stripe API")?;

        log::debug!("Retrieved checkout session {}", session_id);
        parse_response(response).await
    }
}

/// Exponential backoff with 3 attempts
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .context("Failed to parse Stripe response");
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or(body);

    Err(match status {
        StatusCode::UNAUTHORIZED => {
            anyhow!("Stripe authentication failed. Check STRIPE_SECRET_KEY.")
        }
        StatusCode::NOT_FOUND => anyhow!("Stripe object not found: {}", message),
        StatusCode::TOO_MANY_REQUESTS => {
            anyhow!("Stripe API rate limit exceeded. Wait a moment and try again.")
        }
        _ => anyhow!("Stripe error ({}): {}", status, message),
    })
}

/// Form-encode a checkout plan using the API's bracket notation.
pub fn checkout_form(plan: &CheckoutPlan) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), plan.success_url.clone()),
        ("cancel_url".to_string(), plan.cancel_url.clone()),
        ("customer_email".to_string(), plan.email.clone()),
    ];

    for (i, item) in plan.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        match item {
            LineItem::Price { price, quantity } => {
                form.push((format!("{}[price]", prefix), price.clone()));
                form.push((format!("{}[quantity]", prefix), quantity.to_string()));
            }
            LineItem::Inline {
                currency,
                unit_amount,
                name,
                description,
                quantity,
            } => {
                form.push((format!("{}[price_data][currency]", prefix), currency.clone()));
                form.push((
                    format!("{}[price_data][unit_amount]", prefix),
                    unit_amount.to_string(),
                ));
                form.push((
                    format!("{}[price_data][product_data][name]", prefix),
                    name.clone(),
                ));
                form.push((
                    format!("{}[price_data][product_data][description]", prefix),
                    description.clone(),
                ));
                form.push((format!("{}[quantity]", prefix), quantity.to_string()));
            }
        }
    }

    for (k, v) in &plan.payment_intent_metadata {
        form.push((format!("payment_intent_data[metadata][{}]", k), v.clone()));
    }
    for (k, v) in &plan.session_metadata {
        form.push((format!("metadata[{}]", k), v.clone()));
    }

    form
}
