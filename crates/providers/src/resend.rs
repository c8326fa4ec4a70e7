//! Resend email adapter.
//!
//! Plain HTTP API with a bearer token; the created email's id comes back
//! in the response body.

use async_trait::async_trait;
use serde_json::json;

use crate::ChannelError;
use crate::registry::EmailSender;

const SEND_URL: &str = "https://api.resend.com/emails";

pub struct ResendEmail {
    client: reqwest::Client,
    api_key: String,
    from_email: String,
}

impl ResendEmail {
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
            "from": from_email,
            "to": [to],
            "subject": subject,
            "text": body,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmail {
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
            return Err(ChannelError::status("Resend", status, text));
        }

        let json: serde_json::Value = response.json().await.map_err(ChannelError::transport)?;
        let id = json
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChannelError::SendFailure("Resend response missing id".to_string()))?;

        Ok(id.to_string())
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = ResendEmail::payload(
            "no-reply@example.com",
            "ana@x.com",
            "Exame E1 concluído",
            "corpo",
        );
        assert_eq!(payload["from"], "no-reply@example.com");
        assert_eq!(payload["to"][0], "ana@x.com");
        assert_eq!(payload["subject"], "Exame E1 concluído");
        assert_eq!(payload["text"], "corpo");
    }
}
