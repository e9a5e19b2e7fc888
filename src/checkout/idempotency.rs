use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::quiz::AnswerSet;

const KEY_LEN: usize = 32;

/// Idempotency key for a checkout submission.
///
/// SHA-256 over `"{email}-{answers}-{bump}"` where answers are compact JSON
/// with keys sorted, truncated to 32 hex chars. Resubmitting the same quiz
/// reuses the same payment session instead of creating a second one.
pub fn idempotency_key(email: &str, answers: &AnswerSet, bump: bool) -> String {
    let sorted: BTreeMap<&str, &str> = answers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    // A map of strings always serializes
    let answers_json = serde_json::to_string(&sorted).unwrap_or_default();

    let digest = Sha256::digest(format!("{}-{}-{}", email, answers_json, bump).as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(KEY_LEN);
    key
}
