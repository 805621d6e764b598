//! Scenario 3: Respond to Issue
//!
//! The agent wants to open a GitHub issue. Every method is allowed, so the
//! reviewer can both fix the title and leave a note for the agent; the two
//! travel together in one payload.

use serde_json::json;

use inbox_contracts::{error::InboxResult, response::SubmissionMethod};
use inbox_core::SubmissionCoordinator;

use crate::{mock_data, service::InMemoryResumeService};

use super::{print_stream, ScenarioOutcome};

pub const EDITED_TITLE: &str = "Crash on startup when config is missing";
pub const NOTE: &str = "Label this as a bug and assign it to me.";

/// Play the scenario and return its outcome without printing.
pub fn execute() -> InboxResult<ScenarioOutcome> {
    let service = InMemoryResumeService::new();
    let mut coordinator =
        SubmissionCoordinator::new(mock_data::create_issue_interrupt(), Box::new(service.clone()));

    coordinator.edit_field("title", json!(EDITED_TITLE))?;
    coordinator.set_freeform_response(NOTE)?;
    coordinator.select(SubmissionMethod::Respond)?;
    coordinator.submit()?;
    let dispositions = service.deliver_all(&mut coordinator);

    Ok(ScenarioOutcome::collect(&service, &coordinator, &dispositions, Vec::new()))
}

/// Run Scenario 3: Respond to Issue.
pub fn run_scenario() -> InboxResult<()> {
    println!("=== Scenario 3: Respond to Issue ===");
    println!();

    let service = InMemoryResumeService::new();
    let mut coordinator =
        SubmissionCoordinator::new(mock_data::create_issue_interrupt(), Box::new(service.clone()));

    println!(
        "  Action:         {}",
        coordinator.descriptor().action_request.action
    );
    println!(
        "  Multi-method:   {}",
        coordinator.selector().supports_multiple_methods()
    );
    println!();

    coordinator.edit_field("title", json!(EDITED_TITLE))?;
    println!("  Edited title:   {}", EDITED_TITLE);
    coordinator.set_freeform_response(NOTE)?;
    println!("  Response:       {}", NOTE);
    coordinator.select(SubmissionMethod::Respond)?;

    let ticket = coordinator.submit()?;
    println!("  Submit:         ACCEPTED (attempt {})", ticket.attempt);
    if let Some(payload) = coordinator.last_payload() {
        println!(
            "  Wire payload:   {}",
            serde_json::to_string(payload).unwrap_or_default()
        );
    }

    service.deliver_all(&mut coordinator);
    print_stream(&coordinator);

    println!();
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_contracts::{response::SubmissionPayload, submission::SubmissionState};

    #[test]
    fn test_edit_and_response_travel_together() {
        let outcome = execute().unwrap();
        assert_eq!(outcome.final_state, SubmissionState::Finished);
        match &outcome.dispatched[..] {
            [SubmissionPayload::EditAndRespond {
                selected,
                args,
                text,
            }] => {
                assert_eq!(*selected, SubmissionMethod::Respond);
                assert_eq!(args["title"], json!(EDITED_TITLE));
                assert_eq!(args["repo"], json!("inbox"));
                assert_eq!(text, NOTE);
            }
            other => panic!("expected one EditAndRespond payload, got {:?}", other),
        }
    }

    #[test]
    fn test_combined_wire_shape() {
        let outcome = execute().unwrap();
        let wire = serde_json::to_value(&outcome.dispatched[0]).unwrap();
        assert_eq!(wire["method"], json!("respond"));
        assert_eq!(wire["editedArguments"]["title"], json!(EDITED_TITLE));
        assert_eq!(wire["freeformResponse"], json!(NOTE));
    }

    #[test]
    fn test_response_alone_without_edit() {
        let service = InMemoryResumeService::new();
        let mut coordinator = SubmissionCoordinator::new(
            mock_data::create_issue_interrupt(),
            Box::new(service.clone()),
        );
        coordinator.set_freeform_response(NOTE).unwrap();
        coordinator.select(SubmissionMethod::Respond).unwrap();
        coordinator.submit().unwrap();

        assert_eq!(
            service.requests()[0].payload,
            SubmissionPayload::Respond(NOTE.to_string())
        );
    }
}
