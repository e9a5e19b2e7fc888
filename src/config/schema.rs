use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Funnel configuration.
///
/// Every field has a default so an empty file (or no file) is usable for
/// local runs. Secrets are never stored here; see [`crate::credentials`].
///
/// Example YAML:
/// ```yaml
/// site_url: "https://iq.example.com"
/// affiliate_vsl_url: "https://example.com/course?aff=123"
/// from_email: "results@iq.example.com"
/// stripe:
///   price_id: "price_123"
/// variants:
///   price_disclosure: soft
///   headline: B
/// rate_limit:
///   max_requests: 5
///   window: "1m"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Public base URL used for checkout redirects and email links
    pub site_url: String,

    /// Video sales letter linked from the result email
    pub affiliate_vsl_url: String,

    /// Sender address for result emails
    pub from_email: String,

    pub stripe: StripeConfig,

    pub variants: VariantConfig,

    pub rate_limit: RateLimitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            affiliate_vsl_url: "https://example.com/course?aff=123".to_string(),
            from_email: "results@example.com".to_string(),
            stripe: StripeConfig::default(),
            variants: VariantConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Site URL without a trailing slash, ready for path joins.
    pub fn site_base(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

/// Catalog price ids. When unset, checkout sends inline price data instead.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StripeConfig {
    pub price_id: Option<String>,
    pub bump_price_id: Option<String>,
}

/// Active A/B variants, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VariantConfig {
    pub price_disclosure: PriceDisclosureMode,
    pub headline: HeadlineVariant,
    pub vsl_headline: HeadlineVariant,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceDisclosureMode {
    #[default]
    Upfront,
    Soft,
}

impl PriceDisclosureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceDisclosureMode::Upfront => "upfront",
            PriceDisclosureMode::Soft => "soft",
        }
    }
}

impl fmt::Display for PriceDisclosureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum HeadlineVariant {
    #[default]
    A,
    B,
}

impl HeadlineVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadlineVariant::A => "A",
            HeadlineVariant::B => "B",
        }
    }
}

impl fmt::Display for HeadlineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout rate limit per client key.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    pub max_requests: u32,

    /// Window length as a humantime duration, e.g. "1m", "90s"
    pub window: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: "1m".to_string(),
        }
    }
}

impl RateLimitConfig {
    pub fn window_duration(&self) -> Result<Duration> {
        humantime::parse_duration(self.window.trim())
            .with_context(|| format!("Invalid rate limit window '{}'", self.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site_url, "http://localhost:3000");
        assert_eq!(config.variants.price_disclosure, PriceDisclosureMode::Upfront);
        assert_eq!(config.variants.headline, HeadlineVariant::A);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert!(config.stripe.price_id.is_none());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
site_url: "https://iq.example.com/"
variants:
  price_disclosure: soft
  headline: B
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.site_base(), "https://iq.example.com");
        assert_eq!(config.variants.price_disclosure, PriceDisclosureMode::Soft);
        assert_eq!(config.variants.headline, HeadlineVariant::B);
        assert_eq!(config.variants.vsl_headline, HeadlineVariant::A);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
site_url: "https://iq.example.com"
affiliate_vsl_url: "https://partner.example.com/vsl"
from_email: "results@iq.example.com"
stripe:
  price_id: "price_main"
  bump_price_id: "price_bump"
variants:
  price_disclosure: upfront
  headline: A
  vsl_headline: B
rate_limit:
  max_requests: 10
  window: "30s"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.stripe.price_id.as_deref(), Some("price_main"));
        assert_eq!(config.stripe.bump_price_id.as_deref(), Some("price_bump"));
        assert_eq!(config.variants.vsl_headline, HeadlineVariant::B);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(
            config.rate_limit.window_duration().unwrap(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "headline_variant: B\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let yaml = "variants:\n  headline: C\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_invalid_window() {
        let config = RateLimitConfig {
            max_requests: 5,
            window: "soon".to_string(),
        };
        assert!(config.window_duration().is_err());
    }
}
