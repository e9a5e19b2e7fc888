use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::checkout::{Metadata, ResultMetadata};
use crate::config::Config;
use crate::email::{build_result_email, vsl_url, EmailClient, ResultEmailData};
use crate::store::ExpiringStore;
use crate::stripe::{
    construct_event, CheckoutSession, Event, SignatureError, StripeClient,
    CHECKOUT_SESSION_COMPLETED, DEFAULT_TOLERANCE,
};

const EVENT_KEY_PREFIX: &str = "webhook-event:";

/// How long a delivered event id is remembered
pub const PROCESSED_EVENT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Event was already delivered
    Duplicate,
    /// Event acknowledged without action
    Ignored(String),
    /// Result email sent
    Delivered { email: String },
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook Error: {0}")]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Signature(e) => e.status_code(),
            WebhookError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Everything a webhook delivery needs
pub struct WebhookContext<'a> {
    pub stripe: &'a StripeClient,
    pub email: &'a EmailClient,
    /// Shared so store I/O can run on the blocking pool
    pub store: Arc<dyn ExpiringStore>,
    pub config: &'a Config,
    pub webhook_secret: &'a str,
}

/// What to do with a verified event before any API call
#[derive(Debug, PartialEq, Eq)]
enum Triage {
    Ignore(String),
    Deliver { session_id: String },
}

fn triage(event: &Event) -> Triage {
    if event.event_type != CHECKOUT_SESSION_COMPLETED {
        return Triage::Ignore(format!("unhandled event type {}", event.event_type));
    }

    let session: CheckoutSession = match serde_json::from_value(event.data.object.clone()) {
        Ok(session) => session,
        Err(e) => return Triage::Ignore(format!("unreadable session object: {}", e)),
    };

    if !session.is_paid() {
        return Triage::Ignore(format!("session {} is not paid", session.id));
    }

    Triage::Deliver {
        session_id: session.id,
    }
}

/// Email data for a delivered session, or None when the metadata lacks a
/// recipient or score.
fn email_data(metadata: &Metadata, vsl_url: String) -> Result<Option<ResultEmailData>> {
    let has = |key: &str| metadata.get(key).is_some_and(|v| !v.is_empty());
    if !has("email") || !has("iqScore") {
        return Ok(None);
    }
    let result = ResultMetadata::from_metadata(metadata).context("Unreadable result metadata")?;
    Ok(ResultEmailData::from_result(&result, vsl_url))
}

fn event_key(event_id: &str) -> String {
    format!("{}{}", EVENT_KEY_PREFIX, event_id)
}

pub fn is_processed(store: &dyn ExpiringStore, event_id: &str) -> Result<bool> {
    Ok(store.get(&event_key(event_id))?.is_some())
}

pub fn mark_processed(store: &dyn ExpiringStore, event_id: &str) -> Result<()> {
    store.put(
        &event_key(event_id),
        &serde_json::Value::Bool(true),
        PROCESSED_EVENT_TTL,
    )
}

/// Run a store operation off the async workers; disk stores block.
async fn with_store<T, F>(store: &Arc<dyn ExpiringStore>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ExpiringStore) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .context("Store task failed")?
}

/// Relay one webhook delivery: verify, deduplicate, email the result.
///
/// The event id is recorded only after the email is sent, so a failed send is
/// retried when the processor redelivers.
pub async fn handle_webhook(
    payload: &str,
    signature_header: Option<&str>,
    ctx: &WebhookContext<'_>,
    now: DateTime<Utc>,
) -> Result<WebhookOutcome, WebhookError> {
    let event = construct_event(
        payload,
        signature_header,
        ctx.webhook_secret,
        DEFAULT_TOLERANCE,
        now,
    )
    .inspect_err(|e| log::warn!("Webhook signature verification failed: {}", e))?;

    let event_id = event.id.clone();
    if with_store(&ctx.store, move |store| is_processed(store, &event_id)).await? {
        log::info!("Event already processed: {}", event.id);
        return Ok(WebhookOutcome::Duplicate);
    }

    let session_id = match triage(&event) {
        Triage::Ignore(reason) => {
            log::debug!("Ignoring event {}: {}", event.id, reason);
            return Ok(WebhookOutcome::Ignored(reason));
        }
        Triage::Deliver { session_id } => session_id,
    };

    let session = ctx.stripe.retrieve_session(&session_id).await?;
    let link = vsl_url(&ctx.config.affiliate_vsl_url, &session_id)?;
    let Some(data) = email_data(session.result_metadata(), link)? else {
        let reason = format!("session {} has no result metadata", session_id);
        log::warn!("Ignoring event {}: {}", event.id, reason);
        return Ok(WebhookOutcome::Ignored(reason));
    };

    let email = build_result_email(&data, &ctx.config.site_url);
    ctx.email.send(&data.email, &email).await?;
    let event_id = event.id.clone();
    with_store(&ctx.store, move |store| mark_processed(store, &event_id)).await?;

    Ok(WebhookOutcome::Delivered { email: data.email })
}
