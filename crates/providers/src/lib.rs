pub mod dialog360;
pub mod registry;
pub mod resend;
pub mod sendgrid;
pub mod twilio;

use thiserror::Error;

pub use registry::{EmailSender, ProviderRegistry, WhatsappSender};

/// Errors surfaced by provider adapters and the registry.
///
/// Adapters never retry internally; retry ownership lives with the
/// delivery orchestrator, which maps these onto the attempt ledger.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No adapter is bound to the requested channel. Terminal: the
    /// orchestrator records a single failed attempt and escalates
    /// without consuming the retry budget.
    #[error("channel not configured")]
    NotConfigured,

    /// Transport or provider-reported failure for one send call.
    /// Retryable up to the configured attempt budget.
    #[error("{0}")]
    SendFailure(String),
}

impl ChannelError {
    /// Wrap a reqwest transport error (connect failure, timeout, TLS, ...).
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        ChannelError::SendFailure(err.to_string())
    }

    /// Wrap a non-2xx provider response.
    pub(crate) fn status(provider: &str, status: reqwest::StatusCode, body: String) -> Self {
        ChannelError::SendFailure(format!("{} error ({}): {}", provider, status, body))
    }
}
