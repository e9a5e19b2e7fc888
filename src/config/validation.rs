use reqwest::Url;

use super::schema::Config;
use crate::checkout::is_valid_email;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = Url::parse(&config.site_url) {
        errors.push(format!("site_url: invalid URL '{}' - {}", config.site_url, e));
    }

    if let Err(e) = Url::parse(&config.affiliate_vsl_url) {
        errors.push(format!(
            "affiliate_vsl_url: invalid URL '{}' - {}",
            config.affiliate_vsl_url, e
        ));
    }

    if !is_valid_email(&config.from_email) {
        errors.push(format!(
            "from_email: '{}' is not an email address",
            config.from_email
        ));
    }

    for (field, value) in [
        ("stripe.price_id", &config.stripe.price_id),
        ("stripe.bump_price_id", &config.stripe.bump_price_id),
    ] {
        if let Some(id) = value {
            if !id.starts_with("price_") {
                errors.push(format!("{}: '{}' must start with 'price_'", field, id));
            }
        }
    }

    if config.rate_limit.max_requests == 0 {
        errors.push("rate_limit.max_requests: must be at least 1".to_string());
    }

    match config.rate_limit.window_duration() {
        Ok(window) if window.is_zero() => {
            errors.push("rate_limit.window: must be longer than zero".to_string());
        }
        Ok(_) => {}
        Err(e) => errors.push(format!("rate_limit.window: {:#}", e)),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
