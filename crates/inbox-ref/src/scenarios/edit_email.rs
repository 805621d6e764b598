//! Scenario 1: Edit Email
//!
//! The agent wants to send an email and the reviewer corrects the recipient
//! before letting it through.
//!
//!   raw interrupt list → parse → coordinator (default method: edit)
//!     edit recipient to "x"          → InvalidArguments (schema + rule), recorded
//!     edit recipient to "b@example.com" → submit → ack → output → finished
//!
//! The interrupt carries an `args_schema`, so edits are checked structurally
//! before the semantic recipient rule runs.

use serde_json::{json, Map, Value};

use inbox_contracts::{
    error::{InboxError, InboxResult},
    response::SubmissionMethod,
};
use inbox_core::SubmissionCoordinator;
use inbox_verify::SchemaArgumentValidator;

use crate::{mock_data, service::InMemoryResumeService};

use super::{first_reviewable, print_stream, ScenarioOutcome};

pub const CORRECTED_RECIPIENT: &str = "b@example.com";

/// Recipient must look like an email address.
pub fn recipient_rule(args: &Map<String, Value>) -> Option<String> {
    match args.get("recipient").and_then(Value::as_str) {
        Some(r) if r.contains('@') => None,
        Some(r) => Some(format!("recipient '{}' is not an email address", r)),
        None => Some("recipient is required".to_string()),
    }
}

fn validator() -> SchemaArgumentValidator {
    let mut validator = SchemaArgumentValidator::new();
    validator.register_rule("Google_SendEmail", Box::new(recipient_rule));
    validator
}

/// Play the scenario and return its outcome without printing.
pub fn execute() -> InboxResult<ScenarioOutcome> {
    let descriptor = first_reviewable(&mock_data::raw_send_email_interrupt())?;
    let service = InMemoryResumeService::new();
    let mut coordinator = SubmissionCoordinator::new(descriptor, Box::new(service.clone()))
        .with_validator(Box::new(validator()));
    let mut rejections = Vec::new();

    coordinator.edit_field("recipient", json!("x"))?;
    match coordinator.submit() {
        Err(e @ InboxError::InvalidArguments { .. }) => rejections.push(e),
        Err(other) => return Err(other),
        Ok(_) => {}
    }

    coordinator.edit_field("recipient", json!(CORRECTED_RECIPIENT))?;
    coordinator.submit()?;
    let dispositions = service.deliver_all(&mut coordinator);

    Ok(ScenarioOutcome::collect(&service, &coordinator, &dispositions, rejections))
}

/// Run Scenario 1: Edit Email.
pub fn run_scenario() -> InboxResult<()> {
    println!("=== Scenario 1: Edit Email ===");
    println!();

    let descriptor = first_reviewable(&mock_data::raw_send_email_interrupt())?;
    println!("  Action:         {}", descriptor.action_request.action);
    println!(
        "  Arguments:      {}",
        Value::Object(descriptor.action_request.args.clone())
    );
    if let Some(description) = &descriptor.description {
        println!("  Description:    {}", description);
    }
    println!(
        "  Permitted:      {}",
        descriptor
            .config
            .permitted_methods()
            .iter()
            .map(SubmissionMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let service = InMemoryResumeService::new();
    let mut coordinator = SubmissionCoordinator::new(descriptor, Box::new(service.clone()))
        .with_validator(Box::new(validator()));

    if let Some(method) = coordinator.selector().selected() {
        println!("  Default method: {}", method);
    }
    println!();

    println!("  Reviewer sets recipient to \"x\"");
    coordinator.edit_field("recipient", json!("x"))?;
    match coordinator.submit() {
        Err(e @ InboxError::InvalidArguments { .. }) => {
            println!("  Submit:         REJECTED ({})", e)
        }
        Err(other) => return Err(other),
        Ok(ticket) => println!(
            "  Submit:         UNEXPECTEDLY ACCEPTED (attempt {})",
            ticket.attempt
        ),
    }
    println!("  State:          {}", coordinator.state());
    println!();

    println!("  Reviewer sets recipient to \"{}\"", CORRECTED_RECIPIENT);
    coordinator.edit_field("recipient", json!(CORRECTED_RECIPIENT))?;
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
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
