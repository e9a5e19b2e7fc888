use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::StatusCode;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

use super::types::Event;

type HmacSha256 = Hmac<Sha256>;

/// Deliveries signed longer ago than this are rejected as replays
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

const SCHEME: &str = "v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("No signature")]
    MissingHeader,
    #[error("Malformed signature header")]
    MalformedHeader,
    #[error("No signatures found matching the expected signature for payload")]
    NoMatchingSignature,
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutsideTolerance,
    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),
}

impl SignatureError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

struct ParsedHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            SCHEME => {
                // Undecodable candidates can never match; skip them
                if let Ok(sig) = hex::decode(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(ParsedHeader {
            timestamp,
            signatures,
        }),
        Some(_) => Err(SignatureError::NoMatchingSignature),
        None => Err(SignatureError::MalformedHeader),
    }
}

fn mac_for(payload: &str, secret: &str, timestamp: i64) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac
}

/// Check a webhook signature header against the raw request body.
pub fn verify_signature(
    payload: &str,
    header: Option<&str>,
    secret: &str,
    tolerance: Duration,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(SignatureError::MissingHeader)?;
    let parsed = parse_header(header)?;

    let matched = parsed
        .signatures
        .iter()
        .any(|sig| mac_for(payload, secret, parsed.timestamp).verify_slice(sig).is_ok());
    if !matched {
        return Err(SignatureError::NoMatchingSignature);
    }

    let tolerance_secs = i64::try_from(tolerance.as_secs()).unwrap_or(i64::MAX);
    if tolerance_secs > 0 && parsed.timestamp < now.timestamp() - tolerance_secs {
        return Err(SignatureError::TimestampOutsideTolerance);
    }

    Ok(())
}

/// Verify the signature, then parse the body as an event.
pub fn construct_event(
    payload: &str,
    header: Option<&str>,
    secret: &str,
    tolerance: Duration,
    now: DateTime<Utc>,
) -> Result<Event, SignatureError> {
    verify_signature(payload, header, secret, tolerance, now)?;
    serde_json::from_str(payload).map_err(|e| SignatureError::InvalidPayload(e.to_string()))
}

/// Produce a signature header for a payload, as the processor would.
/// Used to replay captured webhook bodies locally.
pub fn sign_payload(payload: &str, secret: &str, timestamp: i64) -> String {
    let sig = mac_for(payload, secret, timestamp).finalize().into_bytes();
    format!("t={},{}={}", timestamp, SCHEME, hex::encode(sig))
}
