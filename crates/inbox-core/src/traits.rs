//! Trait seams between the coordinator and its collaborators.
//!
//! - `ResumeService`: the external resumable-execution service
//! - `ArgumentValidator`: optional check on edited arguments before dispatch
//! - `WarningSink`: transient user-facing notices
//!
//! The coordinator never talks to a transport directly. Hosting applications
//! supply implementations; `inbox-ref` ships in-memory ones.

use serde_json::{Map, Value};

use inbox_contracts::{
    error::InboxResult,
    notice::UserWarning,
    submission::ResumeRequest,
};

/// The service that paused the agent and will resume it once given a
/// finalized response.
///
/// `dispatch` hands the request over and returns without waiting for the
/// stream. Acknowledgement, output, completion, and failure come back later
/// as `StreamEvent`s tagged with `request.ticket`, delivered to
/// `SubmissionCoordinator::handle_event`.
pub trait ResumeService: Send + Sync {
    /// Hand `request` to the service.
    ///
    /// An `Err` means the payload never reached the service (or was rejected
    /// outright); the coordinator records it as a transport failure.
    fn dispatch(&self, request: &ResumeRequest) -> InboxResult<()>;
}

/// Result of validating edited arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentReport {
    /// Human-readable failure messages. Empty on pass.
    pub failures: Vec<String>,
}

impl ArgumentReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Checks reviewer-edited arguments before they leave the coordinator.
pub trait ArgumentValidator: Send + Sync {
    /// Validate `args` for `action`, against `schema` when the interrupt
    /// carries one.
    fn validate(
        &self,
        action: &str,
        args: &Map<String, Value>,
        schema: Option<&Value>,
    ) -> InboxResult<ArgumentReport>;
}

/// Receives transient warnings meant for the reviewer.
pub trait WarningSink {
    fn warn(&self, warning: &UserWarning);
}
