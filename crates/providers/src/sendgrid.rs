//! SendGrid email adapter.
//!
//! Sends through the v3 mail API with a bearer token. SendGrid answers an
//! accepted send with 202 and no body; the message id is carried in the
//! `X-Message-Id` response header.

use async_trait::async_trait;
use serde_json::json;

use crate::ChannelError;
use crate::registry::EmailSender;

const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendgridEmail {
    client: reqwest::Client,
    api_key: String,
    from_email: String,
}

impl SendgridEmail {
    pub fn new(client: reqwest::Client, api_key: String, from_email: String) -> Self {
        Self {
            client,
            api_key,
            from_email,
        }
    }

    /// JSON payload for one plain-text email.
    fn payload(from_email: &str, to: &str, subject: &str, body: &str) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": from_email },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        })
    }
}

#[async_trait]
impl EmailSender for SendgridEmail {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, ChannelError> {
        let response = self
            .client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&Self::payload(&self.from_email, to, subject, body))
            .send()
            .await
            .map_err(ChannelError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChannelError::status("SendGrid", status, text));
        }

        // Accepted sends have no body; the id lives in a header.
        let message_id = response
            .headers()
            .get("X-Message-Id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok(message_id)
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = SendgridEmail::payload(
            "no-reply@example.com",
            "ana@x.com",
            "Exame E1 concluído",
            "corpo",
        );
        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "ana@x.com"
        );
        assert_eq!(payload["from"]["email"], "no-reply@example.com");
        assert_eq!(payload["subject"], "Exame E1 concluído");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][0]["value"], "corpo");
    }
}
