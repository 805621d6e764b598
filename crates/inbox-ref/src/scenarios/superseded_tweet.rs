//! Scenario 4: Superseded Tweet
//!
//! The reviewer answers a tweet interrupt, and while the resumed run is
//! still streaming the agent raises a revised tweet. The coordinator moves
//! to the new interrupt; everything the old run still sends is dropped.

use serde_json::{json, Map};

use inbox_contracts::{
    error::InboxResult,
    interrupt::{InterruptDescriptor, InterruptId},
};
use inbox_core::SubmissionCoordinator;

use crate::{mock_data, service::InMemoryResumeService};

use super::ScenarioOutcome;

pub const FEEDBACK: &str = "Mention the release notes link.";

/// The agent's second attempt after reading the feedback.
pub fn revised_tweet_interrupt() -> InterruptDescriptor {
    let original = mock_data::post_tweet_interrupt();
    let mut args = Map::new();
    args.insert(
        "tweet_text".to_string(),
        json!("Shipping the new inbox today! Release notes: https://example.com/notes"),
    );
    InterruptDescriptor {
        action_request: inbox_contracts::interrupt::ActionRequest {
            action: original.action_request.action.clone(),
            args,
        },
        ..original
    }
}

/// Play the scenario and return its outcome and the id of the replacing
/// interrupt, without printing.
pub fn execute() -> InboxResult<(ScenarioOutcome, InterruptId)> {
    let service = InMemoryResumeService::new();
    let mut coordinator =
        SubmissionCoordinator::new(mock_data::post_tweet_interrupt(), Box::new(service.clone()));

    coordinator.set_freeform_response(FEEDBACK)?;
    coordinator.submit()?;

    // Only the acknowledgement arrives before the agent interrupts again.
    let mut dispositions: Vec<_> = service
        .take_events(1)
        .into_iter()
        .map(|event| coordinator.handle_event(event))
        .collect();

    let replacement = coordinator.receive(revised_tweet_interrupt());
    dispositions.extend(service.deliver_all(&mut coordinator));

    Ok((
        ScenarioOutcome::collect(&service, &coordinator, &dispositions, Vec::new()),
        replacement,
    ))
}

/// Run Scenario 4: Superseded Tweet.
pub fn run_scenario() -> InboxResult<()> {
    println!("=== Scenario 4: Superseded Tweet ===");
    println!();

    let service = InMemoryResumeService::new();
    let mut coordinator =
        SubmissionCoordinator::new(mock_data::post_tweet_interrupt(), Box::new(service.clone()));
    let first = coordinator.interrupt_id();
    println!("  Interrupt:      {} ({})", first, coordinator.descriptor().action_request.action);

    coordinator.set_freeform_response(FEEDBACK)?;
    let ticket = coordinator.submit()?;
    println!("  Response:       {}", FEEDBACK);
    println!("  Submit:         ACCEPTED (attempt {})", ticket.attempt);

    for event in service.take_events(1) {
        coordinator.handle_event(event);
    }
    println!("  State:          {}", coordinator.state());
    println!();

    println!("  [Agent raises a revised tweet mid-stream...]");
    let second = coordinator.receive(revised_tweet_interrupt());
    println!("  Interrupt:      {}", second);
    println!("  State:          {}", coordinator.state());

    let late = service.deliver_all(&mut coordinator);
    println!("  Late events:    {} discarded", late.len());
    println!("  Draft response: {:?}", coordinator.draft().freeform_response());

    println!();
    println!("  Scenario 4 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
