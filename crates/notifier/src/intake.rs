//! Event intake — consumes completion events from the Redis queue and
//! starts one detached orchestration run per event.
//!
//! The upstream signing flow pushes a JSON `CompletionEvent` onto the
//! queue and is acknowledged by the push itself; delivery outcome is
//! never reported back to it. Each popped event gets its own spawned
//! task, so a slow retry loop on one event never delays intake of the
//! next.

use std::sync::Arc;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use laudo_common::types::CompletionEvent;
use laudo_engine::orchestrator::DeliveryOrchestrator;

/// Seconds a single BLPOP blocks before re-checking; keeps shutdown
/// responsive without busy-polling an empty queue.
const POP_TIMEOUT_SECS: f64 = 5.0;

pub struct EventIntake {
    redis: ConnectionManager,
    queue_key: String,
    orchestrator: Arc<DeliveryOrchestrator>,
}

impl EventIntake {
    pub fn new(
        redis: ConnectionManager,
        queue_key: String,
        orchestrator: Arc<DeliveryOrchestrator>,
    ) -> Self {
        Self {
            redis,
            queue_key,
            orchestrator,
        }
    }

    /// Consume the queue indefinitely. Runs until the task is cancelled.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(queue = %self.queue_key, "Event intake started");

        loop {
            let popped: Option<(String, String)> = self
                .redis
                .blpop(&self.queue_key, POP_TIMEOUT_SECS)
                .await?;

            let Some((_, payload)) = popped else {
                continue;
            };

            self.dispatch(&payload);
        }
    }

    /// Parse one queue payload and spawn its orchestration run.
    ///
    /// Malformed payloads are logged and dropped: without an exam id and
    /// recipients there is nothing to retry or escalate.
    fn dispatch(&self, payload: &str) {
        let Some(event) = parse_event(payload) else {
            return;
        };

        tracing::info!(exam_id = %event.exam_id, "Completion event queued for delivery");

        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move {
            match orchestrator.run(&event).await {
                Ok(outcomes) => {
                    tracing::info!(
                        exam_id = %event.exam_id,
                        channels = outcomes.len(),
                        "Orchestration run finished"
                    );
                }
                Err(e) => {
                    // Ledger appends failed; the partial history up to the
                    // failing attempt is already durable.
                    tracing::error!(
                        exam_id = %event.exam_id,
                        error = %e,
                        "Orchestration run aborted"
                    );
                }
            }
        });
    }
}

/// Decode one queue payload, logging and discarding anything that is not
/// a well-formed completion event.
fn parse_event(payload: &str) -> Option<CompletionEvent> {
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed completion event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_accepts_well_formed_payload() {
        let payload = r#"{
            "exam_id": "EX-2041",
            "patient": {
                "name": "Ana Souza",
                "email": "ana@example.com",
                "whatsapp": "+5511999990000"
            },
            "report_summary": "Sem alterações",
            "signed_at": "2025-03-01T12:30:00Z",
            "artifact": { "download_url": "https://reports.example.com/EX-2041.pdf" }
        }"#;

        let event = parse_event(payload).unwrap();
        assert_eq!(event.exam_id, "EX-2041");
        assert_eq!(event.patient.name, "Ana Souza");
    }

    #[test]
    fn test_parse_event_drops_invalid_json() {
        assert!(parse_event("{not json").is_none());
    }

    #[test]
    fn test_parse_event_drops_payload_missing_required_fields() {
        assert!(parse_event(r#"{"exam_id": "EX-1"}"#).is_none());
    }
}
