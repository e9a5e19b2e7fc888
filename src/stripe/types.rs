use serde::Deserialize;

use crate::checkout::Metadata;

/// Event type sent when a hosted checkout finishes
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A field the API returns either as an id or, when expanded, as the object
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(T),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page, present while the session is open
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub payment_intent: Option<Expandable<PaymentIntent>>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// Result fields for this session: the expanded payment intent's metadata
    /// when available (it carries the interpretation), else the session's own.
    pub fn result_metadata(&self) -> &Metadata {
        match &self.payment_intent {
            Some(Expandable::Object(intent)) => &intent.metadata,
            _ => &self.metadata,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// Error envelope returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: Option<String>,
}
