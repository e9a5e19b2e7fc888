use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::template::ResultEmail;

const API_BASE: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Transactional email client
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl EmailClient {
    pub fn new(api_key: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at another API host (e.g. a local mock)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Send one email. Returns the provider's message id.
    pub async fn send(&self, to: &str, email: &ResultEmail) -> Result<String> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: &email.subject,
            html: &email.html,
        };

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        let http = &self.http;
        let key = self.api_key.as_str();
        let url = url.as_str();
        let body = &body;

        let response = Retry::spawn(retry_strategy, move || async move {
            http.post(url).bearer_auth(key).json(body).send().await
        })
        .await
        .context("Failed to reach email API")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Email API error ({}): {}", status, text));
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .context("Failed to parse email API response")?;
        log::info!("Result email sent to {} ({})", to, sent.id);
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = SendEmailRequest {
            from: "results@example.com",
            to: ["jo@example.com"],
            subject: "Subject",
            html: "<p>hi</p>",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"], "results@example.com");
        assert_eq!(json["to"][0], "jo@example.com");
        assert_eq!(json["subject"], "Subject");
        assert_eq!(json["html"], "<p>hi</p>");
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let client = EmailClient::new("re_test", "results@example.com")
            .with_base_url("http://localhost:8025/");
        assert_eq!(client.base_url, "http://localhost:8025");
    }
}
