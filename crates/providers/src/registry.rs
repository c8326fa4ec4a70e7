//! Provider registry — resolves one concrete adapter per channel from
//! configuration at startup.
//!
//! Channel and vendor are independent axes: the registry owns "which
//! vendor backs which channel", adapters own "how one message goes out".
//! Resolution happens exactly once; nothing is looked up per message.

use std::time::Duration;

use async_trait::async_trait;

use laudo_common::config::AppConfig;
use laudo_common::types::Channel;

use crate::ChannelError;
use crate::dialog360::DialogWhatsapp;
use crate::resend::ResendEmail;
use crate::sendgrid::SendgridEmail;
use crate::twilio::TwilioWhatsapp;

/// Capability to send one WhatsApp message. Implementations must not
/// retry internally; retry ownership belongs to the orchestrator.
#[async_trait]
pub trait WhatsappSender: Send + Sync {
    /// Send `body` to the E.164 number `to`, returning the provider
    /// message id.
    async fn send(&self, to: &str, body: &str) -> Result<String, ChannelError>;

    /// Vendor name for logging (e.g. "twilio").
    fn name(&self) -> &'static str;
}

/// Capability to send one email. Same non-retrying contract as
/// [`WhatsappSender`].
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, ChannelError>;

    fn name(&self) -> &'static str;
}

/// One resolved adapter per channel. A `None` slot means the channel is
/// not configured and any selected delivery over it fails fast.
pub struct ProviderRegistry {
    whatsapp: Option<Box<dyn WhatsappSender>>,
    email: Option<Box<dyn EmailSender>>,
}

impl ProviderRegistry {
    /// Resolve adapters from configuration.
    ///
    /// Unset or unknown provider names leave the channel unconfigured;
    /// a known name with missing credentials is a startup error.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_seconds))
            .build()?;

        let whatsapp: Option<Box<dyn WhatsappSender>> =
            match config.whatsapp_provider.as_deref() {
                None => None,
                Some("twilio") => {
                    let sid = require(&config.twilio_account_sid, "TWILIO_ACCOUNT_SID")?;
                    let token = require(&config.twilio_auth_token, "TWILIO_AUTH_TOKEN")?;
                    let from = require(&config.twilio_from_number, "TWILIO_FROM_NUMBER")?;
                    Some(Box::new(TwilioWhatsapp::new(client.clone(), sid, token, from)))
                }
                Some("360dialog") => {
                    let api_key = require(&config.dialog_api_key, "DIALOG_API_KEY")?;
                    Some(Box::new(DialogWhatsapp::new(client.clone(), api_key)))
                }
                Some(other) => {
                    tracing::warn!(provider = other, "Unknown WHATSAPP_PROVIDER, channel disabled");
                    None
                }
            };

        let email: Option<Box<dyn EmailSender>> = match config.email_provider.as_deref() {
            None => None,
            Some("sendgrid") => {
                let api_key = require(&config.sendgrid_api_key, "SENDGRID_API_KEY")?;
                Some(Box::new(SendgridEmail::new(
                    client.clone(),
                    api_key,
                    config.from_email.clone(),
                )))
            }
            Some("resend") => {
                let api_key = require(&config.resend_api_key, "RESEND_API_KEY")?;
                Some(Box::new(ResendEmail::new(
                    client.clone(),
                    api_key,
                    config.from_email.clone(),
                )))
            }
            Some(other) => {
                tracing::warn!(provider = other, "Unknown EMAIL_PROVIDER, channel disabled");
                None
            }
        };

        if let Some(sender) = &whatsapp {
            tracing::info!(provider = sender.name(), "WhatsApp channel configured");
        }
        if let Some(sender) = &email {
            tracing::info!(provider = sender.name(), "Email channel configured");
        }

        Ok(Self { whatsapp, email })
    }

    /// Build a registry from pre-constructed senders. Used by tests and
    /// by callers that wire their own adapters.
    pub fn with_senders(
        whatsapp: Option<Box<dyn WhatsappSender>>,
        email: Option<Box<dyn EmailSender>>,
    ) -> Self {
        Self { whatsapp, email }
    }

    /// Whether an adapter is bound to `channel`.
    pub fn is_configured(&self, channel: Channel) -> bool {
        match channel {
            Channel::Whatsapp => self.whatsapp.is_some(),
            Channel::Email => self.email.is_some(),
        }
    }

    pub async fn send_whatsapp(&self, to: &str, body: &str) -> Result<String, ChannelError> {
        let sender = self.whatsapp.as_ref().ok_or(ChannelError::NotConfigured)?;
        sender.send(to, body).await
    }

    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, ChannelError> {
        let sender = self.email.as_ref().ok_or(ChannelError::NotConfigured)?;
        sender.send(to, subject, body).await
    }
}

fn require(value: &Option<String>, var: &str) -> anyhow::Result<String> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} is required for the configured provider", var))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/laudo".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            event_queue_key: "laudo:completed".to_string(),
            dead_letter_key: "laudo:dead_letter".to_string(),
            whatsapp_provider: None,
            email_provider: None,
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
            dialog_api_key: None,
            sendgrid_api_key: None,
            resend_api_key: None,
            from_email: "no-reply@example.com".to_string(),
            max_delivery_attempts: 3,
            retry_backoff_seconds: 30,
            send_timeout_seconds: 10,
            db_max_connections: 20,
        }
    }

    #[test]
    fn test_unset_providers_leave_channels_unconfigured() {
        let registry = ProviderRegistry::from_config(&base_config()).unwrap();
        assert!(!registry.is_configured(Channel::Whatsapp));
        assert!(!registry.is_configured(Channel::Email));
    }

    #[test]
    fn test_twilio_resolved_with_credentials() {
        let mut config = base_config();
        config.whatsapp_provider = Some("twilio".to_string());
        config.twilio_account_sid = Some("AC123".to_string());
        config.twilio_auth_token = Some("token".to_string());
        config.twilio_from_number = Some("+5511000000000".to_string());

        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(registry.is_configured(Channel::Whatsapp));
        assert!(!registry.is_configured(Channel::Email));
    }

    #[test]
    fn test_twilio_missing_credentials_is_startup_error() {
        let mut config = base_config();
        config.whatsapp_provider = Some("twilio".to_string());

        assert!(ProviderRegistry::from_config(&config).is_err());
    }

    #[test]
    fn test_unknown_provider_name_leaves_channel_unconfigured() {
        let mut config = base_config();
        config.email_provider = Some("pigeon".to_string());

        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(!registry.is_configured(Channel::Email));
    }

    #[test]
    fn test_resend_resolved_with_api_key() {
        let mut config = base_config();
        config.email_provider = Some("resend".to_string());
        config.resend_api_key = Some("re_123".to_string());

        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(registry.is_configured(Channel::Email));
    }

    #[tokio::test]
    async fn test_send_on_unconfigured_channel_fails_fast() {
        let registry = ProviderRegistry::with_senders(None, None);
        let err = registry.send_whatsapp("+5511999990000", "oi").await;
        assert!(matches!(err, Err(ChannelError::NotConfigured)));
    }
}
