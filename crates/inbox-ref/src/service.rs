//! In-memory implementation of `ResumeService`.
//!
//! `InMemoryResumeService` records every dispatched request and queues the
//! stream events a real service would send back later: an acknowledgement,
//! output chunks, and end of stream. Nothing is delivered on its own; the
//! caller drains the outbox and feeds events to the coordinator, which is how
//! network callbacks arrive in a single-threaded event loop.
//!
//! Clones share state through `Arc<Mutex<_>>`, so a scenario can keep a
//! handle while the coordinator owns a boxed clone.

use std::{
    cell::RefCell,
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::json;
use tracing::{debug, info};

use inbox_contracts::{
    error::{InboxError, InboxResult},
    notice::UserWarning,
    response::SubmissionPayload,
    submission::{EventDisposition, ResumeRequest, StreamEvent, StreamEventKind},
};
use inbox_core::{
    traits::{ResumeService, WarningSink},
    SubmissionCoordinator,
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
struct ServiceState {
    requests: Vec<ResumeRequest>,
    outbox: VecDeque<StreamEvent>,
    /// Reasons for upcoming dispatches to reject outright.
    dispatch_failures: VecDeque<String>,
    /// Reasons for upcoming streams to fail after acknowledgement.
    stream_failures: VecDeque<String>,
}

// ── Public service ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryResumeService {
    state: Arc<Mutex<ServiceState>>,
}

impl InMemoryResumeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next dispatch with `reason`.
    pub fn fail_next_dispatch(&self, reason: impl Into<String>) {
        self.lock().dispatch_failures.push_back(reason.into());
    }

    /// Acknowledge the next dispatch, then fail its stream with `reason`.
    pub fn fail_next_stream(&self, reason: impl Into<String>) {
        self.lock().stream_failures.push_back(reason.into());
    }

    /// Every request accepted so far, in dispatch order.
    pub fn requests(&self) -> Vec<ResumeRequest> {
        self.lock().requests.clone()
    }

    pub fn pending_events(&self) -> usize {
        self.lock().outbox.len()
    }

    /// Take up to `limit` queued events, oldest first.
    pub fn take_events(&self, limit: usize) -> Vec<StreamEvent> {
        let mut state = self.lock();
        let n = limit.min(state.outbox.len());
        state.outbox.drain(..n).collect()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&self) -> Vec<StreamEvent> {
        self.lock().outbox.drain(..).collect()
    }

    /// Deliver every queued event to `coordinator` and return what it did
    /// with each one.
    pub fn deliver_all(&self, coordinator: &mut SubmissionCoordinator) -> Vec<EventDisposition> {
        self.drain_events()
            .into_iter()
            .map(|event| coordinator.handle_event(event))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServiceState> {
        self.state.lock().expect("resume service state lock poisoned")
    }
}

/// Output the resumed agent would stream back for `payload`.
fn narrate(payload: &SubmissionPayload) -> Vec<serde_json::Value> {
    let step = match payload {
        SubmissionPayload::Accept => "running tool with the proposed arguments".to_string(),
        SubmissionPayload::Ignore => "skipping the tool call".to_string(),
        SubmissionPayload::Edit(args) => {
            format!("running tool with {} reviewed argument(s)", args.len())
        }
        SubmissionPayload::Respond(text) => format!("agent received feedback: {text}"),
        SubmissionPayload::EditAndRespond { args, text, .. } => format!(
            "running tool with {} reviewed argument(s); agent noted: {text}",
            args.len()
        ),
    };
    vec![
        json!({ "event": "resumed", "method": payload.method() }),
        json!({ "event": "step", "message": step }),
    ]
}

// ── ResumeService impl ────────────────────────────────────────────────────────

impl ResumeService for InMemoryResumeService {
    fn dispatch(&self, request: &ResumeRequest) -> InboxResult<()> {
        let mut state = self.state.lock().map_err(|e| InboxError::TransportFailure {
            reason: format!("resume service state lock poisoned: {}", e),
        })?;

        if let Some(reason) = state.dispatch_failures.pop_front() {
            info!(
                interrupt_id = %request.ticket.interrupt_id,
                attempt = request.ticket.attempt,
                reason = %reason,
                "rejecting dispatch"
            );
            return Err(InboxError::TransportFailure { reason });
        }

        state.requests.push(request.clone());

        let ticket = request.ticket;
        state
            .outbox
            .push_back(StreamEvent::new(ticket, StreamEventKind::Acknowledged));

        if let Some(reason) = state.stream_failures.pop_front() {
            state
                .outbox
                .push_back(StreamEvent::new(ticket, StreamEventKind::Failed { reason }));
        } else {
            for chunk in narrate(&request.payload) {
                state
                    .outbox
                    .push_back(StreamEvent::new(ticket, StreamEventKind::Output { chunk }));
            }
            state
                .outbox
                .push_back(StreamEvent::new(ticket, StreamEventKind::Finished));
        }

        debug!(
            interrupt_id = %ticket.interrupt_id,
            attempt = ticket.attempt,
            queued = state.outbox.len(),
            "dispatch accepted"
        );
        Ok(())
    }
}

// ── Warning sink ──────────────────────────────────────────────────────────────

/// A `WarningSink` that keeps every warning for later inspection.
#[derive(Default)]
pub struct CollectingWarnings {
    warnings: RefCell<Vec<UserWarning>>,
}

impl CollectingWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<UserWarning> {
        self.warnings.borrow().clone()
    }
}

impl WarningSink for CollectingWarnings {
    fn warn(&self, warning: &UserWarning) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
