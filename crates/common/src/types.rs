use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery channel for patient notifications.
///
/// Closed set: adding a channel means adding a variant here plus a matching
/// provider adapter and registry wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Email,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Whatsapp => write!(f, "whatsapp"),
            Channel::Email => write!(f, "email"),
        }
    }
}

/// Terminal status of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Patient contact details carried on a completion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub email: Option<String>,
    /// E.164 phone number, e.g. "+5511999990000".
    pub whatsapp: Option<String>,
}

/// Reference to the externally rendered report artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub download_url: String,
}

/// Signal that a report has been signed and the patient should be notified.
///
/// Produced by the upstream signing flow, consumed exactly once per
/// orchestration run. Read-only input; never persisted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub exam_id: String,
    pub patient: Patient,
    pub report_summary: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub artifact: ReportArtifact,
}

/// One durable record of a single delivery try over one channel.
///
/// Append-only: rows are never mutated or deleted, they are the audit
/// trail. For a given (exam_id, channel), attempt numbers are contiguous
/// from 1 and nothing is written after a delivered row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeliveryAttempt {
    pub exam_id: String,
    pub channel: Channel,
    pub recipient: String,
    /// 1-based attempt counter within (exam_id, channel).
    pub attempt: i32,
    pub status: DeliveryStatus,
    /// Provider message id; present iff status = delivered.
    pub message_id: Option<String>,
    /// Provider error detail; present iff status = failed.
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Final per-channel result of an orchestration run. Derived from the
/// attempt rows, returned to the caller, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub channel: Channel,
    pub recipient: String,
    pub status: DeliveryStatus,
    pub attempts_used: u32,
    pub message_id: Option<String>,
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_display() {
        assert_eq!(Channel::Whatsapp.to_string(), "whatsapp");
        assert_eq!(Channel::Email.to_string(), "email");
    }

    #[test]
    fn test_completion_event_deserializes_minimal() {
        let event: CompletionEvent = serde_json::from_str(
            r#"{
                "exam_id": "EX-1",
                "patient": {"name": "Ana", "email": null, "whatsapp": null},
                "report_summary": null,
                "signed_at": null,
                "artifact": {"download_url": "https://example.com/laudo.pdf"}
            }"#,
        )
        .unwrap();
        assert_eq!(event.exam_id, "EX-1");
        assert!(event.patient.email.is_none());
        assert!(event.signed_at.is_none());
    }

    #[test]
    fn test_completion_event_tolerates_missing_optionals() {
        // Upstream producers may omit optional fields entirely.
        let event: CompletionEvent = serde_json::from_str(
            r#"{
                "exam_id": "EX-2",
                "patient": {"name": "Bruno"},
                "artifact": {"download_url": "https://example.com/laudo.pdf"}
            }"#,
        )
        .unwrap();
        assert!(event.patient.whatsapp.is_none());
        assert!(event.report_summary.is_none());
    }
}
