//! $1 IQ Snapshot funnel: a 25-question quiz, its scoring engine, and the
//! checkout, results, email and webhook collaborators around it.

pub mod browser;
pub mod checkout;
pub mod config;
pub mod credentials;
pub mod email;
pub mod input;
pub mod output;
pub mod quiz;
pub mod rate_limit;
pub mod results;
pub mod scoring;
pub mod store;
pub mod stripe;
pub mod webhook;
