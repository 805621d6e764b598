//! Submission lifecycle types: state, tickets, outbound requests, and the
//! stream events the resumable-execution service delivers back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    interrupt::{InterruptId, ThreadId},
    response::SubmissionPayload,
};

/// Where the current interrupt is in its submission lifecycle.
///
/// ```text
/// idle ──submit──▶ submitting ──ack──▶ streaming ──end──▶ finished
///                     │                   │
///                     └──────error────────┴──▶ failed ──submit──▶ submitting
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    /// Reviewer is still drafting; nothing has been sent.
    Idle,
    /// Payload handed to the service; waiting for acknowledgement.
    Submitting,
    /// The service resumed execution and is emitting output.
    Streaming,
    /// End of stream received. Terminal until a new interrupt arrives.
    Finished,
    /// Dispatch or execution failed. The reason is kept for display.
    Failed { reason: String },
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Streaming => "streaming",
            SubmissionState::Finished => "finished",
            SubmissionState::Failed { .. } => "failed",
        }
    }

    /// True while a submission is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::Submitting | SubmissionState::Streaming)
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one submit attempt for one interrupt.
///
/// `attempt` starts at 1 and increases with every resubmission after failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionTicket {
    pub interrupt_id: InterruptId,
    pub attempt: u32,
}

/// What the coordinator hands to the resumable-execution service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRequest {
    pub ticket: SubmissionTicket,
    /// The execution thread to resume, when the session knows it.
    pub thread_id: Option<ThreadId>,
    pub payload: SubmissionPayload,
    pub submitted_at: DateTime<Utc>,
}

/// A notification from the service about a dispatched submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// The submission this event belongs to.
    pub ticket: SubmissionTicket,
    pub kind: StreamEventKind,
}

impl StreamEvent {
    pub fn new(ticket: SubmissionTicket, kind: StreamEventKind) -> Self {
        Self { ticket, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEventKind {
    /// The service accepted the payload and resumed execution.
    Acknowledged,
    /// One chunk of resumed-execution output.
    Output { chunk: Value },
    /// End of stream.
    Finished,
    /// The service failed while processing the payload.
    Failed { reason: String },
}

impl StreamEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            StreamEventKind::Acknowledged => "acknowledged",
            StreamEventKind::Output { .. } => "output",
            StreamEventKind::Finished => "finished",
            StreamEventKind::Failed { .. } => "failed",
        }
    }
}

/// What the coordinator did with a delivered stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Applied,
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The event belongs to an interrupt that is no longer current.
    SupersededInterrupt,
    /// The event belongs to an earlier attempt of the current interrupt.
    SupersededAttempt,
    /// The event is not a valid transition from the current state.
    UnexpectedInState,
}
