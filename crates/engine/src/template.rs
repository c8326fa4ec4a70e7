//! Message rendering for patient notifications.
//!
//! The body is identical across channels; email additionally carries a
//! subject line. Wording is part of the delivery contract — change it and
//! downstream audit tooling that greps the ledger will disagree with what
//! patients received.

use chrono::Utc;

use laudo_common::types::CompletionEvent;

/// Render the notification body for one event.
///
/// `signed_at` falls back to the current time when the event carries none;
/// a missing summary renders as "N/A".
pub fn render_body(event: &CompletionEvent) -> String {
    let signed_at = event
        .signed_at
        .unwrap_or_else(Utc::now)
        .to_rfc3339();
    let summary = event.report_summary.as_deref().unwrap_or("N/A");

    format!(
        "Olá {}, seu laudo do exame {} foi assinado em {}.\nResumo: {}.\nBaixe o PDF em: {}",
        event.patient.name, event.exam_id, signed_at, summary, event.artifact.download_url
    )
}

/// Render the email subject line for one event.
pub fn render_subject(event: &CompletionEvent) -> String {
    format!("Exame {} concluído", event.exam_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use laudo_common::types::{Patient, ReportArtifact};

    fn make_event() -> CompletionEvent {
        CompletionEvent {
            exam_id: "E1".to_string(),
            patient: Patient {
                name: "Ana".to_string(),
                email: Some("ana@x.com".to_string()),
                whatsapp: Some("+551199990000".to_string()),
            },
            report_summary: Some("normal".to_string()),
            signed_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap()),
            artifact: ReportArtifact {
                download_url: "https://files.example.com/E1.pdf".to_string(),
            },
        }
    }

    #[test]
    fn test_body_exact() {
        let body = render_body(&make_event());
        assert_eq!(
            body,
            "Olá Ana, seu laudo do exame E1 foi assinado em 2026-03-01T12:30:00+00:00.\n\
             Resumo: normal.\n\
             Baixe o PDF em: https://files.example.com/E1.pdf"
        );
    }

    #[test]
    fn test_missing_summary_renders_na() {
        let mut event = make_event();
        event.report_summary = None;
        assert!(render_body(&event).contains("Resumo: N/A."));
    }

    #[test]
    fn test_missing_signed_at_falls_back_to_now() {
        let mut event = make_event();
        event.signed_at = None;
        let body = render_body(&event);
        // Exact instant is unobservable; the line must still be well-formed.
        assert!(body.starts_with("Olá Ana, seu laudo do exame E1 foi assinado em 2"));
    }

    #[test]
    fn test_subject_exact() {
        assert_eq!(render_subject(&make_event()), "Exame E1 concluído");
    }
}
