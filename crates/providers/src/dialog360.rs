//! 360dialog WhatsApp adapter.
//!
//! Sends through the 360dialog WhatsApp Business API (`D360-API-KEY`
//! header, JSON body). The message id comes back in `messages[0].id`.

use async_trait::async_trait;
use serde_json::json;

use crate::ChannelError;
use crate::registry::WhatsappSender;

const MESSAGES_URL: &str = "https://waba.360dialog.io/v1/messages";

pub struct DialogWhatsapp {
    client: reqwest::Client,
    api_key: String,
}

impl DialogWhatsapp {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// JSON payload for one text message.
    fn payload(to: &str, body: &str) -> serde_json::Value {
        json!({
            "to": to,
            "type": "text",
            "text": { "body": body },
        })
    }
}

#[async_trait]
impl WhatsappSender for DialogWhatsapp {
    async fn send(&self, to: &str, body: &str) -> Result<String, ChannelError> {
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("D360-API-KEY", &self.api_key)
            .json(&Self::payload(to, body))
            .send()
            .await
            .map_err(ChannelError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChannelError::status("360dialog", status, text));
        }

        let json: serde_json::Value = response.json().await.map_err(ChannelError::transport)?;
        let id = json
            .get("messages")
            .and_then(|m| m.get(0))
            .and_then(|m| m.get("id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ChannelError::SendFailure("360dialog response missing message id".to_string())
            })?;

        Ok(id.to_string())
    }

    fn name(&self) -> &'static str {
        "360dialog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = DialogWhatsapp::payload("+5511999990000", "oi");
        assert_eq!(payload["to"], "+5511999990000");
        assert_eq!(payload["type"], "text");
        assert_eq!(payload["text"]["body"], "oi");
    }
}
