//! Channel selector — derives the (channel, recipient) pairs to attempt
//! from a completion event.

use laudo_common::types::{Channel, CompletionEvent};

/// Ordered, deterministic list of delivery targets for one event:
/// whatsapp before email, and only channels whose recipient is present
/// and non-empty. No side effects; an empty result means the
/// orchestrator does no work for this event.
pub fn select_channels(event: &CompletionEvent) -> Vec<(Channel, String)> {
    let mut targets = Vec::new();

    if let Some(number) = &event.patient.whatsapp
        && !number.is_empty()
    {
        targets.push((Channel::Whatsapp, number.clone()));
    }

    if let Some(address) = &event.patient.email
        && !address.is_empty()
    {
        targets.push((Channel::Email, address.clone()));
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use laudo_common::types::{Patient, ReportArtifact};

    fn make_event(whatsapp: Option<&str>, email: Option<&str>) -> CompletionEvent {
        CompletionEvent {
            exam_id: "EX-1".to_string(),
            patient: Patient {
                name: "Ana".to_string(),
                email: email.map(String::from),
                whatsapp: whatsapp.map(String::from),
            },
            report_summary: None,
            signed_at: None,
            artifact: ReportArtifact {
                download_url: "https://example.com/laudo.pdf".to_string(),
            },
        }
    }

    #[test]
    fn test_whatsapp_ordered_before_email() {
        let targets = select_channels(&make_event(Some("+5511999990000"), Some("ana@x.com")));
        assert_eq!(
            targets,
            vec![
                (Channel::Whatsapp, "+5511999990000".to_string()),
                (Channel::Email, "ana@x.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_recipients_yields_empty() {
        assert!(select_channels(&make_event(None, None)).is_empty());
    }

    #[test]
    fn test_empty_strings_are_skipped() {
        let targets = select_channels(&make_event(Some(""), Some("ana@x.com")));
        assert_eq!(targets, vec![(Channel::Email, "ana@x.com".to_string())]);
    }

    #[test]
    fn test_single_channel_events() {
        let whatsapp_only = select_channels(&make_event(Some("+5511999990000"), None));
        assert_eq!(whatsapp_only.len(), 1);
        assert_eq!(whatsapp_only[0].0, Channel::Whatsapp);

        let email_only = select_channels(&make_event(None, Some("ana@x.com")));
        assert_eq!(email_only.len(), 1);
        assert_eq!(email_only[0].0, Channel::Email);
    }
}
