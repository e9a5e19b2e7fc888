pub mod idempotency;
pub mod metadata;
pub mod plan;
pub mod request;

pub use idempotency::idempotency_key;
pub use metadata::{
    payment_intent_metadata, session_metadata, Metadata, MetadataError, ResultMetadata,
};
pub use plan::{prepare_checkout, CheckoutPlan, LineItem};
pub use request::{is_valid_email, normalize_email, CheckoutError, CheckoutRequest};
