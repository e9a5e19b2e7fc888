pub mod client;
pub mod signature;
pub mod types;

pub use client::{checkout_form, StripeClient};
pub use signature::{
    construct_event, sign_payload, verify_signature, SignatureError, DEFAULT_TOLERANCE,
};
pub use types::{CheckoutSession, Event, Expandable, PaymentIntent, CHECKOUT_SESSION_COMPLETED};
