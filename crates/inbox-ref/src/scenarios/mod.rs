//! Scripted review scenarios.
//!
//! Each scenario wires a real `SubmissionCoordinator` to the in-memory
//! resume service, plays a reviewer's actions against one of the sample
//! interrupts, and reports what the service received.

use serde_json::Value;

use inbox_contracts::{
    error::{InboxError, InboxResult},
    inbound::InboundInterrupt,
    interrupt::InterruptDescriptor,
    response::SubmissionPayload,
    submission::{EventDisposition, SubmissionState},
};
use inbox_core::SubmissionCoordinator;

use crate::service::InMemoryResumeService;

pub mod authorize;
pub mod edit_email;
pub mod respond_issue;
pub mod studio_link;
pub mod superseded_tweet;

/// What a coordinator-driven scenario ended with.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Payloads the service accepted, in dispatch order.
    pub dispatched: Vec<SubmissionPayload>,
    pub final_state: SubmissionState,
    pub output: Vec<Value>,
    /// Events the coordinator refused to apply.
    pub discarded: usize,
    /// Reviewer actions the coordinator rejected, in order.
    pub rejections: Vec<InboxError>,
}

impl ScenarioOutcome {
    fn collect(
        service: &InMemoryResumeService,
        coordinator: &SubmissionCoordinator,
        dispositions: &[EventDisposition],
        rejections: Vec<InboxError>,
    ) -> Self {
        Self {
            dispatched: service.requests().into_iter().map(|r| r.payload).collect(),
            final_state: coordinator.state().clone(),
            output: coordinator.stream_output().to_vec(),
            discarded: dispositions
                .iter()
                .filter(|d| matches!(d, EventDisposition::Discarded(_)))
                .count(),
            rejections,
        }
    }
}

/// The first reviewable interrupt in a raw upstream value.
fn first_reviewable(raw: &Value) -> InboxResult<InterruptDescriptor> {
    InboundInterrupt::parse_all(raw)?
        .into_iter()
        .find_map(InboundInterrupt::into_review)
        .ok_or_else(|| InboxError::MalformedInterrupt {
            reason: "no reviewable interrupt in value".to_string(),
        })
}

/// Print the stream output and final state in the shared demo layout.
fn print_stream(coordinator: &SubmissionCoordinator) {
    for chunk in coordinator.stream_output() {
        println!("  Stream:         {}", chunk);
    }
    println!("  Final state:    {}", coordinator.state());
}
