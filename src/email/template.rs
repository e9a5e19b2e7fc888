use anyhow::{Context, Result};
use reqwest::Url;

use crate::checkout::ResultMetadata;
use crate::scoring::Band;

pub const RESULT_EMAIL_SUBJECT: &str = "Your IQ Snapshot Results Are Ready";

/// Fields rendered into the result email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEmailData {
    pub email: String,
    pub iq_score: u32,
    pub percentile: u32,
    pub band: Band,
    pub interpretation: String,
    pub vsl_url: String,
}

impl ResultEmailData {
    /// Build from paid-result metadata. None when the metadata has no recipient.
    pub fn from_result(result: &ResultMetadata, vsl_url: String) -> Option<Self> {
        Some(Self {
            email: result.email.clone()?,
            iq_score: result.iq_score,
            percentile: result.percentile,
            band: result.band,
            interpretation: result.interpretation.clone(),
            vsl_url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEmail {
    pub subject: String,
    pub html: String,
}

/// Affiliate training link for a paid session. Any `session_id` already on
/// the affiliate URL is replaced.
pub fn vsl_url(affiliate_url: &str, session_id: &str) -> Result<String> {
    let mut url = Url::parse(affiliate_url)
        .with_context(|| format!("Invalid affiliate URL '{}'", affiliate_url))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "session_id")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("session_id", session_id);
    Ok(url.to_string())
}

/// Render the result email. `site_url` is used for the legal footer links.
pub fn build_result_email(data: &ResultEmailData, site_url: &str) -> ResultEmail {
    let site = site_url.trim_end_matches('/');
    let subject = RESULT_EMAIL_SUBJECT;

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{subject}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ text-align: center; padding: 20px 0; border-bottom: 3px solid #2563eb; }}
    .results {{ background: #f9fafb; border-radius: 8px; padding: 30px; margin: 30px 0; text-align: center; }}
    .score {{ font-size: 48px; font-weight: bold; color: #2563eb; margin: 10px 0; }}
    .band {{ font-size: 20px; color: #059669; font-weight: 600; margin: 10px 0; }}
    .percentile {{ font-size: 16px; color: #6b7280; margin: 10px 0; }}
    .interpretation {{ text-align: left; margin: 20px 0; padding: 20px; background: white; border-radius: 6px; border-left: 4px solid #2563eb; }}
    .cta {{ text-align: center; margin: 30px 0; }}
    .cta a {{ display: inline-block; background: #2563eb; color: white; padding: 16px 32px; text-decoration: none; border-radius: 6px; font-weight: 600; font-size: 18px; }}
    .disclosure {{ font-size: 12px; color: #6b7280; padding: 20px; background: #f9fafb; border-radius: 6px; margin: 30px 0; }}
    .footer {{ text-align: center; padding: 20px 0; border-top: 1px solid #e5e7eb; color: #6b7280; font-size: 12px; margin-top: 30px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Your IQ Snapshot Results</h1>
    </div>

    <div class="results">
      <div class="score">{iq_score}</div>
      <div class="band">{band}</div>
      <div class="percentile">You scored higher than approximately {percentile}% of test-takers</div>

      <div class="interpretation">
        <strong>What This Means:</strong><br/>
        {interpretation}
      </div>
    </div>

    <h2 style="text-align: center; color: #1f2937;">Ready to Maximize Your Cognitive Potential?</h2>

    <p>Now that you know where you stand, discover the science-backed system that can help you sharpen your mental edge, improve focus, and boost your performance in just 30 days.</p>

    <div class="cta">
      <a href="{vsl_url}">Watch Free Training &rarr;</a>
    </div>

    <div class="disclosure">
      <strong>Disclosure:</strong> This email contains an affiliate link. If you choose to purchase through our recommendation, we may receive a commission at no additional cost to you. This assessment is for educational and entertainment purposes only and is not a clinical diagnostic tool.
    </div>

    <div class="footer">
      <p><strong>The $1 IQ Snapshot</strong></p>
      <p>Educational assessment &bull; Non-diagnostic &bull; For entertainment purposes</p>
      <p>
        <a href="{site}/legal/terms" style="color: #2563eb; text-decoration: none;">Terms</a> &bull;
        <a href="{site}/legal/privacy" style="color: #2563eb; text-decoration: none;">Privacy</a> &bull;
        <a href="{site}/legal/affiliate-disclosure" style="color: #2563eb; text-decoration: none;">Affiliate Disclosure</a>
      </p>
    </div>
  </div>
</body>
</html>
"#,
        subject = subject,
        iq_score = data.iq_score,
        band = data.band,
        percentile = data.percentile,
        interpretation = data.interpretation,
        vsl_url = data.vsl_url,
        site = site,
    );

    ResultEmail {
        subject: subject.to_string(),
        html,
    }
}
