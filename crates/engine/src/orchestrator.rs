//! Delivery orchestrator — the per-channel retry state machine.
//!
//! One orchestration run consumes one completion event and drives an
//! independent retry loop for each selected (channel, recipient) pair:
//!
//! 1. Resolve the configured adapter; an unconfigured channel records a
//!    single failed attempt and escalates immediately, no retries.
//! 2. Otherwise attempt delivery up to `max_delivery_attempts` times,
//!    writing exactly one ledger row per attempt and sleeping
//!    `retry_backoff * attempt` between failures.
//! 3. Exhaustion escalates exactly once; success stops the channel.
//!
//! Channels run sequentially and never affect each other's outcome. Send
//! failures are absorbed here; only ledger append failures propagate,
//! since losing the audit row voids the delivery guarantee.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use laudo_common::types::{
    Channel, CompletionEvent, DeliveryAttempt, DeliveryOutcome, DeliveryStatus,
};
use laudo_providers::ProviderRegistry;

use crate::escalator::FailureEscalator;
use crate::ledger::DeliveryLedger;
use crate::selector::select_channels;
use crate::template::{render_body, render_subject};

const NOT_CONFIGURED_DETAIL: &str = "channel not configured";

/// Drives delivery for completion events. Cheap to clone behind `Arc`s;
/// one instance serves all concurrently spawned runs.
pub struct DeliveryOrchestrator {
    registry: Arc<ProviderRegistry>,
    ledger: Arc<dyn DeliveryLedger>,
    escalator: Arc<dyn FailureEscalator>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl DeliveryOrchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        ledger: Arc<dyn DeliveryLedger>,
        escalator: Arc<dyn FailureEscalator>,
        max_attempts: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            registry,
            ledger,
            escalator,
            max_attempts,
            retry_backoff,
        }
    }

    /// Run delivery for one event across all selected channels.
    ///
    /// Returns one outcome per selected channel, in selection order.
    /// An event with no usable recipients returns an empty vec and
    /// writes nothing.
    pub async fn run(&self, event: &CompletionEvent) -> anyhow::Result<Vec<DeliveryOutcome>> {
        let targets = select_channels(event);

        if targets.is_empty() {
            tracing::info!(exam_id = %event.exam_id, "No notification channels for event");
            return Ok(vec![]);
        }

        let mut outcomes = Vec::with_capacity(targets.len());
        for (channel, recipient) in targets {
            let outcome = self.deliver_channel(event, channel, &recipient).await?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Execute the retry loop for a single channel.
    async fn deliver_channel(
        &self,
        event: &CompletionEvent,
        channel: Channel,
        recipient: &str,
    ) -> anyhow::Result<DeliveryOutcome> {
        if !self.registry.is_configured(channel) {
            self.append(event, channel, recipient, 1, Err(NOT_CONFIGURED_DETAIL))
                .await?;
            self.escalator
                .escalate(&event.exam_id, channel, recipient, NOT_CONFIGURED_DETAIL)
                .await;

            return Ok(DeliveryOutcome {
                channel,
                recipient: recipient.to_string(),
                status: DeliveryStatus::Failed,
                attempts_used: 1,
                message_id: None,
                error_message: Some(NOT_CONFIGURED_DETAIL.to_string()),
            });
        }

        let mut attempt: u32 = 1;
        loop {
            let body = render_body(event);
            let result = match channel {
                Channel::Whatsapp => self.registry.send_whatsapp(recipient, &body).await,
                Channel::Email => {
                    let subject = render_subject(event);
                    self.registry.send_email(recipient, &subject, &body).await
                }
            };

            match result {
                Ok(message_id) => {
                    self.append(event, channel, recipient, attempt, Ok(&message_id))
                        .await?;
                    tracing::info!(
                        exam_id = %event.exam_id,
                        channel = %channel,
                        attempt,
                        message_id = %message_id,
                        "Notification delivered"
                    );

                    return Ok(DeliveryOutcome {
                        channel,
                        recipient: recipient.to_string(),
                        status: DeliveryStatus::Delivered,
                        attempts_used: attempt,
                        message_id: Some(message_id),
                        error_message: None,
                    });
                }
                Err(e) => {
                    let detail = e.to_string();
                    self.append(event, channel, recipient, attempt, Err(&detail))
                        .await?;
                    tracing::warn!(
                        exam_id = %event.exam_id,
                        channel = %channel,
                        attempt,
                        error = %detail,
                        "Delivery attempt failed"
                    );

                    if attempt >= self.max_attempts {
                        self.escalator
                            .escalate(&event.exam_id, channel, recipient, &detail)
                            .await;

                        return Ok(DeliveryOutcome {
                            channel,
                            recipient: recipient.to_string(),
                            status: DeliveryStatus::Failed,
                            attempts_used: attempt,
                            message_id: None,
                            error_message: Some(detail),
                        });
                    }

                    // Linear backoff, scaled by the attempt just completed.
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Write one attempt row. `result` carries the provider message id on
    /// success or the error detail on failure.
    async fn append(
        &self,
        event: &CompletionEvent,
        channel: Channel,
        recipient: &str,
        attempt: u32,
        result: Result<&str, &str>,
    ) -> anyhow::Result<()> {
        let (status, message_id, error_message) = match result {
            Ok(id) => (DeliveryStatus::Delivered, Some(id.to_string()), None),
            Err(detail) => (DeliveryStatus::Failed, None, Some(detail.to_string())),
        };

        self.ledger
            .append(&DeliveryAttempt {
                exam_id: event.exam_id.clone(),
                channel,
                recipient: recipient.to_string(),
                attempt: attempt as i32,
                status,
                message_id,
                error_message,
                created_at: Utc::now(),
            })
            .await?;

        Ok(())
    }
}
