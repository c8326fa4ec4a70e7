//! Twilio WhatsApp adapter.
//!
//! Sends through the Twilio Messages API using basic auth and a form-encoded
//! body. Twilio expects both parties prefixed with `whatsapp:`.

use async_trait::async_trait;

use crate::ChannelError;
use crate::registry::WhatsappSender;

pub struct TwilioWhatsapp {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioWhatsapp {
    pub fn new(
        client: reqwest::Client,
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Self {
        Self {
            client,
            account_sid,
            auth_token,
            from_number,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }

    /// Form parameters for one message send.
    fn form_params(from_number: &str, to: &str, body: &str) -> Vec<(&'static str, String)> {
        vec![
            ("From", format!("whatsapp:{}", from_number)),
            ("To", format!("whatsapp:{}", to)),
            ("Body", body.to_string()),
        ]
    }
}

#[async_trait]
impl WhatsappSender for TwilioWhatsapp {
    async fn send(&self, to: &str, body: &str) -> Result<String, ChannelError> {
        let params = Self::form_params(&self.from_number, to, body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(ChannelError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChannelError::status("Twilio", status, text));
        }

        let json: serde_json::Value = response.json().await.map_err(ChannelError::transport)?;
        let sid = json
            .get("sid")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChannelError::SendFailure("Twilio response missing sid".to_string()))?;

        Ok(sid.to_string())
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_params_prefix_whatsapp() {
        let params = TwilioWhatsapp::form_params("+5511000000000", "+5511999990000", "oi");
        assert_eq!(
            params,
            vec![
                ("From", "whatsapp:+5511000000000".to_string()),
                ("To", "whatsapp:+5511999990000".to_string()),
                ("Body", "oi".to_string()),
            ]
        );
    }

    #[test]
    fn test_messages_url_includes_account_sid() {
        let adapter = TwilioWhatsapp::new(
            reqwest::Client::new(),
            "AC123".to_string(),
            "token".to_string(),
            "+5511000000000".to_string(),
        );
        assert_eq!(
            adapter.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
