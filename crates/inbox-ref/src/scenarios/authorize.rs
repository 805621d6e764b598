//! Scenario 2: Authorize Tool
//!
//! The email tool cannot run until the user authorizes it. The upstream
//! service says so with bare messages and a tool error rather than full
//! interrupt objects:
//!
//!   "user_id is required ..."          → warning, nothing to review
//!   "Please use the following link ..." → accept-only authorization interrupt
//!     select edit   → UnsupportedMethod (accept stays selected)
//!     submit accept → transport failure → state failed
//!     submit accept → attempt 2 → ack → output → finished
//!   tool error (rate limited, can retry) → warning with retry hint

use serde_json::Value;

use inbox_contracts::{
    error::{InboxError, InboxResult},
    inbound::InboundInterrupt,
    notice::UserWarning,
    response::SubmissionMethod,
};
use inbox_core::SubmissionCoordinator;

use crate::{
    mock_data,
    service::{CollectingWarnings, InMemoryResumeService},
};

use super::{first_reviewable, print_stream, ScenarioOutcome};

pub const OUTAGE: &str = "connection reset by peer";

/// Route every value in `raw` through the coordinator.
fn route(
    coordinator: &mut SubmissionCoordinator,
    raw: &Value,
    warnings: &CollectingWarnings,
) -> InboxResult<()> {
    for inbound in InboundInterrupt::parse_all(raw)? {
        coordinator.receive_inbound(inbound, warnings);
    }
    Ok(())
}

/// Play the scenario and return its outcome and the warnings raised,
/// without printing.
pub fn execute() -> InboxResult<(ScenarioOutcome, Vec<UserWarning>)> {
    let service = InMemoryResumeService::new();
    let warnings = CollectingWarnings::new();
    let descriptor = first_reviewable(&mock_data::raw_authorization_prompt())?;
    let mut coordinator = SubmissionCoordinator::new(descriptor, Box::new(service.clone()));
    let mut rejections = Vec::new();

    route(&mut coordinator, &mock_data::raw_missing_user_message(), &warnings)?;

    if let Err(e) = coordinator.select(SubmissionMethod::Edit) {
        rejections.push(e);
    }

    service.fail_next_dispatch(OUTAGE);
    match coordinator.submit() {
        Err(e @ InboxError::TransportFailure { .. }) => rejections.push(e),
        Err(other) => return Err(other),
        Ok(_) => {}
    }

    coordinator.submit()?;
    let dispositions = service.deliver_all(&mut coordinator);

    route(&mut coordinator, &mock_data::raw_send_email_tool_error(), &warnings)?;

    let outcome = ScenarioOutcome::collect(&service, &coordinator, &dispositions, rejections);
    Ok((outcome, warnings.warnings()))
}

/// Run Scenario 2: Authorize Tool.
pub fn run_scenario() -> InboxResult<()> {
    println!("=== Scenario 2: Authorize Tool ===");
    println!();

    let service = InMemoryResumeService::new();
    let warnings = CollectingWarnings::new();

    println!("  [Agent runs Google_SendEmail without a user id...]");
    let descriptor = first_reviewable(&mock_data::raw_authorization_prompt())?;
    let mut coordinator = SubmissionCoordinator::new(descriptor, Box::new(service.clone()));
    route(&mut coordinator, &mock_data::raw_missing_user_message(), &warnings)?;
    for warning in warnings.warnings() {
        println!("  Warning:        {}: {}", warning.title, warning.message);
    }
    println!();

    let action = &coordinator.descriptor().action_request;
    println!("  Action:         {}", action.action);
    if let Some(url) = action.args.get("url").and_then(Value::as_str) {
        println!("  Authorize at:   {}", url);
    }
    println!(
        "  Default method: {}",
        coordinator
            .selector()
            .selected()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!();

    match coordinator.select(SubmissionMethod::Edit) {
        Err(e) => println!("  Select edit:    REJECTED ({})", e),
        Ok(()) => println!("  Select edit:    UNEXPECTEDLY ACCEPTED"),
    }

    println!("  [Simulating network outage on first dispatch...]");
    service.fail_next_dispatch(OUTAGE);
    match coordinator.submit() {
        Err(e) => println!("  Submit:         FAILED ({})", e),
        Ok(ticket) => println!(
            "  Submit:         UNEXPECTEDLY ACCEPTED (attempt {})",
            ticket.attempt
        ),
    }
    println!("  State:          {}", coordinator.state());
    println!();

    let ticket = coordinator.submit()?;
    println!("  Resubmit:       ACCEPTED (attempt {})", ticket.attempt);
    service.deliver_all(&mut coordinator);
    print_stream(&coordinator);
    println!();

    println!("  [Tool hits its rate limit...]");
    let before = warnings.warnings().len();
    route(&mut coordinator, &mock_data::raw_send_email_tool_error(), &warnings)?;
    for warning in warnings.warnings().iter().skip(before) {
        println!("  Warning:        {}: {}", warning.title, warning.message);
    }
    println!("  State:          {}", coordinator.state());

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
