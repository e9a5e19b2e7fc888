use http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::VariantConfig;
use crate::scoring::{Band, ScoreResult};

/// Flat string key/value metadata as stored by the payment processor.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Result data not found")]
    NotFound,
    #[error("Invalid result metadata: {field} = '{value}'")]
    InvalidField { field: &'static str, value: String },
}

impl MetadataError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MetadataError::NotFound => StatusCode::NOT_FOUND,
            MetadataError::InvalidField { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Metadata attached to the checkout session itself.
pub fn session_metadata(email: &str, score: &ScoreResult, bump: bool) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("email".to_string(), email.to_string());
    metadata.insert("iqScore".to_string(), score.iq_score.to_string());
    metadata.insert("rawScore".to_string(), score.raw_score.to_string());
    metadata.insert("percentile".to_string(), score.percentile.to_string());
    metadata.insert("band".to_string(), score.band.label().to_string());
    metadata.insert("bump".to_string(), bump.to_string());
    metadata
}

/// Metadata attached to the payment intent: the session keys plus the
/// interpretation and the variants the visitor saw.
pub fn payment_intent_metadata(
    email: &str,
    score: &ScoreResult,
    bump: bool,
    variants: &VariantConfig,
) -> Metadata {
    let mut metadata = session_metadata(email, score, bump);
    metadata.insert("interpretation".to_string(), score.interpretation.clone());
    metadata.insert(
        "price_disclosure_mode".to_string(),
        variants.price_disclosure.to_string(),
    );
    metadata.insert("headline_variant".to_string(), variants.headline.to_string());
    metadata.insert(
        "vsl_headline_variant".to_string(),
        variants.vsl_headline.to_string(),
    );
    metadata
}

/// A paid result read back out of payment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub email: Option<String>,
    pub iq_score: u32,
    pub raw_score: u32,
    pub percentile: u32,
    pub band: Band,
    pub interpretation: String,
    pub bump: bool,
}

impl ResultMetadata {
    /// Parse stringified result fields.
    ///
    /// `iqScore` must be present. `rawScore` defaults to 0 and a missing
    /// `interpretation` falls back to the band's text (session-level metadata
    /// does not carry it).
    pub fn from_metadata(metadata: &Metadata) -> Result<Self, MetadataError> {
        let iq_score = match metadata.get("iqScore") {
            Some(v) if !v.is_empty() => parse_u32("iqScore", v)?,
            _ => return Err(MetadataError::NotFound),
        };

        let raw_score = match metadata.get("rawScore") {
            Some(v) => parse_u32("rawScore", v)?,
            None => 0,
        };

        let percentile_str = metadata.get("percentile").map(String::as_str).unwrap_or("");
        let percentile = parse_u32("percentile", percentile_str)?;

        let band_str = metadata.get("band").map(String::as_str).unwrap_or("");
        let band = Band::from_label(band_str).ok_or_else(|| MetadataError::InvalidField {
            field: "band",
            value: band_str.to_string(),
        })?;

        let interpretation = metadata
            .get("interpretation")
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| band.interpretation().to_string());

        Ok(Self {
            email: metadata.get("email").filter(|s| !s.is_empty()).cloned(),
            iq_score,
            raw_score,
            percentile,
            band,
            interpretation,
            bump: metadata.get("bump").is_some_and(|b| b == "true"),
        })
    }
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, MetadataError> {
    value.trim().parse().map_err(|_| MetadataError::InvalidField {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HeadlineVariant, PriceDisclosureMode};

    #[test]
    fn test_session_metadata_keys() {
        let score = ScoreResult::from_raw(13);
        let metadata = session_metadata("jo@example.com", &score, true);
        assert_eq!(metadata["email"], "jo@example.com");
        assert_eq!(metadata["iqScore"], "102");
        assert_eq!(metadata["rawScore"], "13");
        assert_eq!(metadata["percentile"], "75");
        assert_eq!(metadata["band"], "Above Average");
        assert_eq!(metadata["bump"], "true");
        assert!(!metadata.contains_key("interpretation"));
    }

    #[test]
    fn test_payment_intent_metadata_adds_variants() {
        let score = ScoreResult::from_raw(20);
        let variants = VariantConfig {
            price_disclosure: PriceDisclosureMode::Soft,
            headline: HeadlineVariant::B,
            vsl_headline: HeadlineVariant::A,
        };
        let metadata = payment_intent_metadata("jo@example.com", &score, false, &variants);
        assert_eq!(metadata["interpretation"], score.interpretation);
        assert_eq!(metadata["price_disclosure_mode"], "soft");
        assert_eq!(metadata["headline_variant"], "B");
        assert_eq!(metadata["vsl_headline_variant"], "A");
    }

    #[test]
    fn test_reads_back_payment_intent_metadata() {
        let score = ScoreResult::from_raw(21);
        let metadata = payment_intent_metadata(
            "jo@example.com",
            &score,
            true,
            &VariantConfig::default(),
        );
        let parsed = ResultMetadata::from_metadata(&metadata).unwrap();
        assert_eq!(parsed.email.as_deref(), Some("jo@example.com"));
        assert_eq!(parsed.iq_score, score.iq_score);
        assert_eq!(parsed.raw_score, score.raw_score);
        assert_eq!(parsed.percentile, score.percentile);
        assert_eq!(parsed.band, score.band);
        assert_eq!(parsed.interpretation, score.interpretation);
        assert!(parsed.bump);
    }

    #[test]
    fn test_session_metadata_derives_interpretation() {
        let score = ScoreResult::from_raw(5);
        let metadata = session_metadata("jo@example.com", &score, false);
        let parsed = ResultMetadata::from_metadata(&metadata).unwrap();
        assert_eq!(parsed.interpretation, Band::BelowAverage.interpretation());
        assert!(!parsed.bump);
    }

    #[test]
    fn test_missing_iq_score_is_not_found() {
        let mut metadata = Metadata::new();
        metadata.insert("email".to_string(), "jo@example.com".to_string());
        assert_eq!(
            ResultMetadata::from_metadata(&metadata),
            Err(MetadataError::NotFound)
        );
    }

    #[test]
    fn test_raw_score_defaults_to_zero() {
        let mut metadata = session_metadata("jo@example.com", &ScoreResult::from_raw(9), false);
        metadata.remove("rawScore");
        let parsed = ResultMetadata::from_metadata(&metadata).unwrap();
        assert_eq!(parsed.raw_score, 0);
    }

    #[test]
    fn test_garbage_fields_rejected() {
        let mut metadata = session_metadata("jo@example.com", &ScoreResult::from_raw(9), false);
        metadata.insert("percentile".to_string(), "lots".to_string());
        let err = ResultMetadata::from_metadata(&metadata).unwrap_err();
        assert_eq!(
            err,
            MetadataError::InvalidField {
                field: "percentile",
                value: "lots".to_string()
            }
        );

        metadata.insert("percentile".to_string(), "42".to_string());
        metadata.insert("band".to_string(), "Genius".to_string());
        assert!(ResultMetadata::from_metadata(&metadata).is_err());
    }
}
