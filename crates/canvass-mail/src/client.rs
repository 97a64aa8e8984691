//! Resend API client implementing the [`Mailer`] trait.

use std::time::Duration;

use canvass_core::error::CanvassResult;
use canvass_core::mail::{MailMessage, Mailer};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::MailError;

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire payload for the Resend `/emails` endpoint.
#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

/// Mail delivery over the Resend JSON API.
///
/// The API key is sent as a bearer token and never logged.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .user_agent("canvass/0.1 (+reqwest)")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.into(),
            api_key,
            from,
        })
    }

    /// Override the API endpoint (test servers).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl Mailer for ResendMailer {
    async fn send(&self, message: &MailMessage) -> CanvassResult<()> {
        let body = SendEmailBody {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        debug!(
            recipients = message.to.len(),
            subject = %message.subject,
            "Sending mail"
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(MailError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        info!(recipients = message.to.len(), "Mail accepted for delivery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_expected_fields() {
        let to = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let body = SendEmailBody {
            from: "no-reply@canvass.app",
            to: &to,
            subject: "Updates",
            html: "<p>hello</p>",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"], "no-reply@canvass.app");
        assert_eq!(json["to"].as_array().unwrap().len(), 2);
        assert_eq!(json["subject"], "Updates");
        assert_eq!(json["html"], "<p>hello</p>");
    }
}
