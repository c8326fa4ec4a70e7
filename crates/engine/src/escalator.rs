//! Failure escalation — terminal sink for channels that ran out of
//! retries or were never configured.
//!
//! Escalation is invoked exactly once per failed channel, performs no
//! retries itself, and never affects the other channel of the same event.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::json;

use laudo_common::types::Channel;

/// Terminal sink for exhausted or unconfigurable deliveries.
#[async_trait]
pub trait FailureEscalator: Send + Sync {
    async fn escalate(&self, exam_id: &str, channel: Channel, recipient: &str, last_error: &str);
}

/// Escalator that emits a structured error record to the log stream.
/// This is the minimum viable alerting sink; operators page off of it.
pub struct TracingEscalator;

#[async_trait]
impl FailureEscalator for TracingEscalator {
    async fn escalate(&self, exam_id: &str, channel: Channel, recipient: &str, last_error: &str) {
        tracing::error!(
            exam_id,
            channel = %channel,
            recipient,
            last_error,
            "Delivery failed permanently"
        );
    }
}

/// Escalator that also pushes a JSON failure record onto a Redis
/// dead-letter list for out-of-band reprocessing or alert fan-out.
pub struct DeadLetterEscalator {
    redis: ConnectionManager,
    key: String,
}

impl DeadLetterEscalator {
    pub fn new(redis: ConnectionManager, key: String) -> Self {
        Self { redis, key }
    }
}

#[async_trait]
impl FailureEscalator for DeadLetterEscalator {
    async fn escalate(&self, exam_id: &str, channel: Channel, recipient: &str, last_error: &str) {
        tracing::error!(
            exam_id,
            channel = %channel,
            recipient,
            last_error,
            "Delivery failed permanently"
        );

        let record = json!({
            "exam_id": exam_id,
            "channel": channel.to_string(),
            "recipient": recipient,
            "last_error": last_error,
            "failed_at": Utc::now(),
        })
        .to_string();

        // Best effort: losing a dead-letter entry must not take the run
        // down, the ledger already holds the authoritative failure rows.
        let mut conn = self.redis.clone();
        if let Err(e) = conn.rpush::<_, _, ()>(&self.key, record).await {
            tracing::warn!(error = %e, key = %self.key, "Failed to push dead-letter record");
        }
    }
}
