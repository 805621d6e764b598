//! The submission coordinator: owns the lifecycle of the current interrupt.
//!
//! The coordinator enforces the review model:
//!
//!   Descriptor → Draft + Method → [guards] → Payload → Validate → Dispatch → Stream
//!
//! Every guard runs synchronously before `ResumeService::dispatch()` is
//! reached, so a rejected submit never has an external side effect. Stream
//! progress arrives later as identity-tagged `StreamEvent`s; events for a
//! superseded interrupt or attempt are discarded.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use inbox_contracts::{
    error::{InboxError, InboxResult},
    inbound::InboundInterrupt,
    interrupt::{InterruptDescriptor, InterruptId, ThreadId},
    response::{SubmissionMethod, SubmissionPayload},
    submission::{
        DiscardReason, EventDisposition, ResumeRequest, StreamEvent, StreamEventKind,
        SubmissionState, SubmissionTicket,
    },
};

use crate::{
    draft::ResponseDraft,
    selector::MethodSelector,
    traits::{ArgumentValidator, ResumeService, WarningSink},
};

/// Everything that belongs to one installed interrupt. Replaced wholesale
/// when a different descriptor arrives.
struct CurrentInterrupt {
    id: InterruptId,
    descriptor: InterruptDescriptor,
    draft: ResponseDraft,
    selector: MethodSelector,
    state: SubmissionState,
    /// Number of submit attempts that reached dispatch. Zero before the first.
    attempt: u32,
    output: Vec<Value>,
    last_payload: Option<SubmissionPayload>,
}

impl CurrentInterrupt {
    fn install(descriptor: InterruptDescriptor) -> Self {
        Self {
            id: InterruptId::new(),
            draft: ResponseDraft::new(&descriptor),
            selector: MethodSelector::new(&descriptor),
            descriptor,
            state: SubmissionState::Idle,
            attempt: 0,
            output: Vec::new(),
            last_payload: None,
        }
    }
}

/// Coordinates review and submission for one pending interrupt at a time.
///
/// Construct one coordinator per review surface. It owns its collaborators
/// and shares nothing with other coordinators.
pub struct SubmissionCoordinator {
    service: Box<dyn ResumeService>,
    validator: Option<Box<dyn ArgumentValidator>>,
    thread_id: Option<ThreadId>,
    current: CurrentInterrupt,
}

impl SubmissionCoordinator {
    /// Create a coordinator with `descriptor` as the current interrupt.
    pub fn new(descriptor: InterruptDescriptor, service: Box<dyn ResumeService>) -> Self {
        let current = CurrentInterrupt::install(descriptor);
        info!(
            interrupt_id = %current.id,
            action = %current.descriptor.action_request.action,
            "interrupt installed"
        );
        Self {
            service,
            validator: None,
            thread_id: None,
            current,
        }
    }

    /// Check edited arguments with `validator` before every dispatch.
    pub fn with_validator(mut self, validator: Box<dyn ArgumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach the execution thread every resume request is addressed to.
    pub fn with_thread_id(mut self, thread_id: Option<ThreadId>) -> Self {
        self.thread_id = thread_id;
        self
    }

    // ── Interrupt arrival ────────────────────────────────────────────────────

    /// Make `descriptor` the current interrupt.
    ///
    /// A descriptor equal to the current one is a re-delivery and changes
    /// nothing, unless the current interrupt has already finished. Anything
    /// else fully resets draft, method, and state under a fresh
    /// `InterruptId`; an in-flight submission is abandoned and its later
    /// events are discarded.
    pub fn receive(&mut self, descriptor: InterruptDescriptor) -> InterruptId {
        if descriptor == self.current.descriptor && self.current.state != SubmissionState::Finished
        {
            debug!(interrupt_id = %self.current.id, "interrupt re-delivered, keeping state");
            return self.current.id;
        }

        if self.current.state.is_in_flight() {
            warn!(
                interrupt_id = %self.current.id,
                attempt = self.current.attempt,
                state = %self.current.state,
                "abandoning in-flight submission for superseded interrupt"
            );
        }

        self.current = CurrentInterrupt::install(descriptor);
        info!(
            interrupt_id = %self.current.id,
            action = %self.current.descriptor.action_request.action,
            "interrupt installed"
        );
        self.current.id
    }

    /// Route one value raised by the upstream service.
    ///
    /// Reviewable interrupts go through `receive`. Tool errors and plain
    /// messages leave the current interrupt untouched and are reported to
    /// `warnings`; `None` is returned for them.
    pub fn receive_inbound(
        &mut self,
        inbound: InboundInterrupt,
        warnings: &dyn WarningSink,
    ) -> Option<InterruptId> {
        if let Some(notice) = inbound.notice() {
            if let InboundInterrupt::ToolError(error) = &inbound {
                warn!(
                    tool = %error.tool,
                    can_retry = error.is_retryable(),
                    retry_after_ms = ?error.retry_after_ms,
                    "tool error raised by upstream service"
                );
            } else {
                info!(message = %notice.message, "message raised by upstream service");
            }
            warnings.warn(&notice);
            return None;
        }
        inbound.into_review().map(|descriptor| self.receive(descriptor))
    }

    // ── Draft and method mutation ────────────────────────────────────────────

    pub fn edit_field(&mut self, name: &str, value: Value) -> InboxResult<()> {
        self.ensure_mutable()?;
        self.current.draft.edit_field(name, value)
    }

    pub fn revert_field(&mut self, name: &str) -> InboxResult<()> {
        self.ensure_mutable()?;
        self.current.draft.revert_field(name)
    }

    pub fn revert_all(&mut self) -> InboxResult<()> {
        self.ensure_mutable()?;
        self.current.draft.revert_all();
        Ok(())
    }

    pub fn set_freeform_response(&mut self, text: impl Into<String>) -> InboxResult<()> {
        self.ensure_mutable()?;
        self.current.draft.set_freeform_response(text);
        Ok(())
    }

    pub fn select(&mut self, method: SubmissionMethod) -> InboxResult<()> {
        self.ensure_mutable()?;
        self.current.selector.select(method)
    }

    // ── Submission ───────────────────────────────────────────────────────────

    /// Finalize the draft and hand it to the resumable-execution service.
    ///
    /// # Pipeline
    ///
    /// 1. Lifecycle guard: only `idle` or `failed` may submit
    /// 2. A permitted method must be selected
    /// 3. Build the payload from the method and draft (`NothingToSubmit` if
    ///    the method needs content the draft lacks)
    /// 4. Validate edited arguments, when a validator is configured
    /// 5. Move to `submitting` and dispatch; a dispatch error moves to
    ///    `failed` and returns `TransportFailure`
    ///
    /// Steps 1-4 have no side effects. Returns the ticket stream events for
    /// this attempt will carry.
    pub fn submit(&mut self) -> InboxResult<SubmissionTicket> {
        // ── Step 1: Lifecycle guard ──────────────────────────────────────────
        self.ensure_mutable()?;

        // ── Step 2: Method ───────────────────────────────────────────────────
        let method = self
            .current
            .selector
            .selected()
            .ok_or(InboxError::NoMethodSelected)?;
        if !self.current.selector.permits(method) {
            return Err(InboxError::UnsupportedMethod { method });
        }

        // ── Step 3: Payload ──────────────────────────────────────────────────
        let payload = finalize_payload(
            method,
            self.current.selector.supports_multiple_methods(),
            &self.current.draft,
        )?;

        // ── Step 4: Argument validation ──────────────────────────────────────
        if let (Some(validator), Some(args)) = (&self.validator, payload.edited_arguments()) {
            let descriptor = &self.current.descriptor;
            let report = validator.validate(
                &descriptor.action_request.action,
                args,
                descriptor.args_schema.as_ref(),
            )?;
            if !report.passed() {
                let reason = report.failures.join("; ");
                warn!(
                    interrupt_id = %self.current.id,
                    failures = %reason,
                    "edited arguments failed validation"
                );
                return Err(InboxError::InvalidArguments { reason });
            }
        }

        // ── Step 5: Dispatch ─────────────────────────────────────────────────
        let current = &mut self.current;
        current.attempt += 1;
        let ticket = SubmissionTicket {
            interrupt_id: current.id,
            attempt: current.attempt,
        };
        let request = ResumeRequest {
            ticket,
            thread_id: self.thread_id.clone(),
            payload: payload.clone(),
            submitted_at: Utc::now(),
        };

        current.state = SubmissionState::Submitting;
        current.output.clear();
        current.last_payload = Some(payload);

        info!(
            interrupt_id = %ticket.interrupt_id,
            attempt = ticket.attempt,
            method = %request.payload.method(),
            "submitting interrupt response"
        );

        if let Err(err) = self.service.dispatch(&request) {
            let reason = match err {
                InboxError::TransportFailure { reason } => reason,
                other => other.to_string(),
            };
            warn!(
                interrupt_id = %ticket.interrupt_id,
                attempt = ticket.attempt,
                reason = %reason,
                "dispatch failed"
            );
            self.current.state = SubmissionState::Failed {
                reason: reason.clone(),
            };
            return Err(InboxError::TransportFailure { reason });
        }

        Ok(ticket)
    }

    // ── Stream events ────────────────────────────────────────────────────────

    /// Apply a stream event delivered by the service.
    ///
    /// Events whose ticket does not match the current interrupt and attempt
    /// are discarded without touching state, as are events that are not a
    /// valid transition from the current state.
    pub fn handle_event(&mut self, event: StreamEvent) -> EventDisposition {
        let current = &mut self.current;

        if event.ticket.interrupt_id != current.id {
            debug!(
                event_interrupt_id = %event.ticket.interrupt_id,
                current_interrupt_id = %current.id,
                kind = event.kind.name(),
                "discarding event for superseded interrupt"
            );
            return EventDisposition::Discarded(DiscardReason::SupersededInterrupt);
        }
        if event.ticket.attempt != current.attempt {
            debug!(
                interrupt_id = %current.id,
                event_attempt = event.ticket.attempt,
                current_attempt = current.attempt,
                kind = event.kind.name(),
                "discarding event for superseded attempt"
            );
            return EventDisposition::Discarded(DiscardReason::SupersededAttempt);
        }

        let kind_name = event.kind.name();
        let next = match (&current.state, event.kind) {
            (SubmissionState::Submitting, StreamEventKind::Acknowledged) => {
                SubmissionState::Streaming
            }
            // First output doubles as the acknowledgement.
            (
                SubmissionState::Submitting | SubmissionState::Streaming,
                StreamEventKind::Output { chunk },
            ) => {
                current.output.push(chunk);
                SubmissionState::Streaming
            }
            (
                SubmissionState::Submitting | SubmissionState::Streaming,
                StreamEventKind::Finished,
            ) => SubmissionState::Finished,
            (
                SubmissionState::Submitting | SubmissionState::Streaming,
                StreamEventKind::Failed { reason },
            ) => SubmissionState::Failed { reason },
            (state, _) => {
                warn!(
                    interrupt_id = %current.id,
                    state = %state,
                    kind = kind_name,
                    "ignoring stream event not valid in current state"
                );
                return EventDisposition::Discarded(DiscardReason::UnexpectedInState);
            }
        };

        if next != current.state {
            info!(
                interrupt_id = %current.id,
                attempt = current.attempt,
                from = %current.state,
                to = %next,
                "submission state changed"
            );
        }
        current.state = next;
        EventDisposition::Applied
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn interrupt_id(&self) -> InterruptId {
        self.current.id
    }

    pub fn descriptor(&self) -> &InterruptDescriptor {
        &self.current.descriptor
    }

    pub fn draft(&self) -> &ResponseDraft {
        &self.current.draft
    }

    pub fn selector(&self) -> &MethodSelector {
        &self.current.selector
    }

    pub fn state(&self) -> &SubmissionState {
        &self.current.state
    }

    pub fn attempt(&self) -> u32 {
        self.current.attempt
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    /// True once the resumed execution has signalled end of stream.
    pub fn stream_finished(&self) -> bool {
        self.current.state == SubmissionState::Finished
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.current.state {
            SubmissionState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Output chunks received for the latest attempt, in arrival order.
    pub fn stream_output(&self) -> &[Value] {
        &self.current.output
    }

    /// The payload of the latest attempt that reached dispatch.
    pub fn last_payload(&self) -> Option<&SubmissionPayload> {
        self.current.last_payload.as_ref()
    }

    fn ensure_mutable(&self) -> InboxResult<()> {
        match &self.current.state {
            SubmissionState::Idle | SubmissionState::Failed { .. } => Ok(()),
            SubmissionState::Submitting | SubmissionState::Streaming => {
                Err(InboxError::SubmissionInProgress {
                    state: self.current.state.name().to_string(),
                })
            }
            SubmissionState::Finished => Err(InboxError::AlreadyResolved),
        }
    }
}

/// Build the outgoing payload for `method` from `draft`.
///
/// `accept` and `ignore` never carry draft content. `edit` requires an edited
/// field and `respond` requires non-blank text; when the interrupt supports
/// multiple methods the other part rides along if the reviewer provided it.
pub fn finalize_payload(
    method: SubmissionMethod,
    supports_multiple_methods: bool,
    draft: &ResponseDraft,
) -> InboxResult<SubmissionPayload> {
    let edited = || -> Map<String, Value> { draft.fields().clone() };
    let text = || draft.freeform_response().to_string();

    let payload = match method {
        SubmissionMethod::Accept => SubmissionPayload::Accept,
        SubmissionMethod::Ignore => SubmissionPayload::Ignore,
        SubmissionMethod::Edit => {
            if !draft.has_edited() {
                return Err(InboxError::NothingToSubmit {
                    method,
                    reason: "no argument differs from the proposed value".to_string(),
                });
            }
            if supports_multiple_methods && draft.has_added_response() {
                SubmissionPayload::EditAndRespond {
                    selected: method,
                    args: edited(),
                    text: text(),
                }
            } else {
                SubmissionPayload::Edit(edited())
            }
        }
        SubmissionMethod::Respond => {
            if !draft.has_added_response() {
                return Err(InboxError::NothingToSubmit {
                    method,
                    reason: "response text is empty".to_string(),
                });
            }
            if supports_multiple_methods && draft.has_edited() {
                SubmissionPayload::EditAndRespond {
                    selected: method,
                    args: edited(),
                    text: text(),
                }
            } else {
                SubmissionPayload::Respond(text())
            }
        }
    };
    Ok(payload)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Map, Value};

    use std::cell::RefCell;

    use inbox_contracts::{
        error::{InboxError, InboxResult},
        inbound::{InboundInterrupt, ToolErrorInterrupt},
        interrupt::{InterruptConfig, InterruptDescriptor, InterruptId, ThreadId},
        notice::UserWarning,
        response::{SubmissionMethod, SubmissionPayload},
        submission::{
            DiscardReason, EventDisposition, ResumeRequest, StreamEvent, StreamEventKind,
            SubmissionState, SubmissionTicket,
        },
    };

    use crate::traits::{ArgumentReport, ArgumentValidator, ResumeService, WarningSink};

    use super::SubmissionCoordinator;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A service that records every dispatched request and can be told to
    /// fail the next dispatch.
    #[derive(Clone, Default)]
    struct MockService {
        requests: Arc<Mutex<Vec<ResumeRequest>>>,
        fail_next: Arc<Mutex<Option<String>>>,
    }

    impl MockService {
        fn sent(&self) -> Vec<ResumeRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn fail_next(&self, reason: &str) {
            *self.fail_next.lock().unwrap() = Some(reason.to_string());
        }
    }

    impl ResumeService for MockService {
        fn dispatch(&self, request: &ResumeRequest) -> InboxResult<()> {
            if let Some(reason) = self.fail_next.lock().unwrap().take() {
                return Err(InboxError::TransportFailure { reason });
            }
            self.requests.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    /// A validator that rejects any `to` address outside example.com.
    struct DomainValidator;

    impl ArgumentValidator for DomainValidator {
        fn validate(
            &self,
            _action: &str,
            args: &Map<String, Value>,
            _schema: Option<&Value>,
        ) -> InboxResult<ArgumentReport> {
            let mut report = ArgumentReport::default();
            if let Some(to) = args.get("to").and_then(Value::as_str) {
                if !to.ends_with("@example.com") {
                    report.failures.push(format!("'{to}' is outside example.com"));
                }
            }
            Ok(report)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        warnings: RefCell<Vec<UserWarning>>,
    }

    impl WarningSink for RecordingSink {
        fn warn(&self, warning: &UserWarning) {
            self.warnings.borrow_mut().push(warning.clone());
        }
    }

    fn send_email(config: InterruptConfig) -> InterruptDescriptor {
        let mut args = Map::new();
        args.insert("to".to_string(), json!("a@x.com"));
        InterruptDescriptor::new("send_email", args, config)
    }

    fn edit_only() -> InterruptConfig {
        InterruptConfig {
            allow_edit: true,
            ..InterruptConfig::default()
        }
    }

    fn everything() -> InterruptConfig {
        InterruptConfig {
            allow_accept: true,
            allow_edit: true,
            allow_respond: true,
            allow_ignore: true,
        }
    }

    fn coordinator(config: InterruptConfig) -> (SubmissionCoordinator, MockService) {
        let service = MockService::default();
        let coordinator = SubmissionCoordinator::new(send_email(config), Box::new(service.clone()));
        (coordinator, service)
    }

    fn event(ticket: SubmissionTicket, kind: StreamEventKind) -> StreamEvent {
        StreamEvent::new(ticket, kind)
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    #[test]
    fn edit_scenario_sends_edited_arguments() {
        let (mut c, service) = coordinator(edit_only());

        c.edit_field("to", json!("b@x.com")).unwrap();
        assert!(c.draft().has_edited());
        c.select(SubmissionMethod::Edit).unwrap();

        let ticket = c.submit().unwrap();

        assert_eq!(c.state(), &SubmissionState::Submitting);
        assert_eq!(ticket.attempt, 1);
        let sent = service.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            serde_json::to_value(&sent[0].payload).unwrap(),
            json!({ "method": "edit", "editedArguments": { "to": "b@x.com" } })
        );
    }

    #[test]
    fn accept_sends_no_arguments_even_after_edits() {
        let (mut c, service) = coordinator(everything());

        c.edit_field("to", json!("b@x.com")).unwrap();
        c.set_freeform_response("looks fine").unwrap();
        c.select(SubmissionMethod::Accept).unwrap();
        c.submit().unwrap();

        assert_eq!(service.sent()[0].payload, SubmissionPayload::Accept);
        // Switching methods never wipes the draft.
        assert_eq!(c.draft().field("to"), Some(&json!("b@x.com")));
    }

    #[test]
    fn edit_without_changes_is_nothing_to_submit() {
        let (mut c, service) = coordinator(edit_only());
        c.select(SubmissionMethod::Edit).unwrap();

        let err = c.submit().unwrap_err();

        assert!(matches!(err, InboxError::NothingToSubmit { method: SubmissionMethod::Edit, .. }));
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert!(service.sent().is_empty(), "no dispatch on local validation failure");
    }

    #[test]
    fn respond_requires_non_blank_text() {
        let (mut c, service) = coordinator(everything());
        c.select(SubmissionMethod::Respond).unwrap();
        c.set_freeform_response("   ").unwrap();

        assert!(matches!(c.submit(), Err(InboxError::NothingToSubmit { .. })));

        c.set_freeform_response("wrong recipient").unwrap();
        c.submit().unwrap();
        assert_eq!(
            service.sent()[0].payload,
            SubmissionPayload::Respond("wrong recipient".to_string())
        );
    }

    #[test]
    fn ignore_needs_no_content() {
        let (mut c, service) = coordinator(everything());
        c.select(SubmissionMethod::Ignore).unwrap();
        c.submit().unwrap();
        assert_eq!(service.sent()[0].payload, SubmissionPayload::Ignore);
    }

    #[test]
    fn multi_method_combines_edit_and_response() {
        let (mut c, service) = coordinator(everything());
        c.edit_field("to", json!("b@x.com")).unwrap();
        c.set_freeform_response("cc the team next time").unwrap();
        c.select(SubmissionMethod::Respond).unwrap();

        c.submit().unwrap();

        let payload = &service.sent()[0].payload;
        match payload {
            SubmissionPayload::EditAndRespond {
                selected,
                args,
                text,
            } => {
                assert_eq!(*selected, SubmissionMethod::Respond);
                assert_eq!(args["to"], json!("b@x.com"));
                assert_eq!(text, "cc the team next time");
            }
            other => panic!("expected EditAndRespond, got {:?}", other),
        }

        let wire = serde_json::to_value(payload).unwrap();
        assert_eq!(wire["method"], json!("respond"));
        assert_eq!(wire["editedArguments"]["to"], json!("b@x.com"));
    }

    #[test]
    fn combined_payload_keeps_edit_when_edit_is_selected() {
        let (mut c, service) = coordinator(everything());
        c.edit_field("to", json!("b@x.com")).unwrap();
        c.set_freeform_response("cc the team next time").unwrap();
        c.select(SubmissionMethod::Edit).unwrap();

        c.submit().unwrap();

        let wire = serde_json::to_value(&service.sent()[0].payload).unwrap();
        assert_eq!(wire["method"], json!("edit"));
        assert_eq!(wire["freeformResponse"], json!("cc the team next time"));
    }

    #[test]
    fn single_method_drops_the_other_part() {
        let config = InterruptConfig {
            allow_edit: true,
            allow_accept: true,
            ..InterruptConfig::default()
        };
        let (mut c, service) = coordinator(config);
        c.edit_field("to", json!("b@x.com")).unwrap();
        c.set_freeform_response("ignored").unwrap();
        c.select(SubmissionMethod::Edit).unwrap();

        c.submit().unwrap();

        assert!(matches!(service.sent()[0].payload, SubmissionPayload::Edit(_)));
    }

    #[test]
    fn unsupported_method_leaves_selection_unchanged() {
        let (mut c, _service) = coordinator(edit_only());

        let err = c.select(SubmissionMethod::Accept).unwrap_err();

        assert_eq!(err, InboxError::UnsupportedMethod { method: SubmissionMethod::Accept });
        assert_eq!(c.selector().selected(), Some(SubmissionMethod::Edit));
    }

    #[test]
    fn nothing_permitted_fails_with_no_method_selected() {
        let (mut c, service) = coordinator(InterruptConfig::default());
        assert_eq!(c.submit().unwrap_err(), InboxError::NoMethodSelected);
        assert!(service.sent().is_empty());
    }

    #[test]
    fn mutation_blocked_while_in_flight_and_allowed_after_failure() {
        let (mut c, _service) = coordinator(edit_only());
        c.edit_field("to", json!("b@x.com")).unwrap();
        let ticket = c.submit().unwrap();

        assert!(matches!(
            c.edit_field("to", json!("c@x.com")),
            Err(InboxError::SubmissionInProgress { .. })
        ));
        assert!(matches!(
            c.set_freeform_response("x"),
            Err(InboxError::SubmissionInProgress { .. })
        ));
        assert!(matches!(c.submit(), Err(InboxError::SubmissionInProgress { .. })));

        c.handle_event(event(ticket, StreamEventKind::Acknowledged));
        assert!(matches!(
            c.select(SubmissionMethod::Edit),
            Err(InboxError::SubmissionInProgress { .. })
        ));

        c.handle_event(event(
            ticket,
            StreamEventKind::Failed { reason: "tool crashed".to_string() },
        ));
        assert_eq!(c.failure_reason(), Some("tool crashed"));
        c.edit_field("to", json!("c@x.com")).unwrap();
        assert_eq!(c.draft().field("to"), Some(&json!("c@x.com")));
    }

    #[test]
    fn full_stream_lifecycle_reaches_finished() {
        let (mut c, _service) = coordinator(edit_only());
        c.edit_field("to", json!("b@x.com")).unwrap();
        let ticket = c.submit().unwrap();

        assert_eq!(
            c.handle_event(event(ticket, StreamEventKind::Acknowledged)),
            EventDisposition::Applied
        );
        assert_eq!(c.state(), &SubmissionState::Streaming);
        c.handle_event(event(ticket, StreamEventKind::Output { chunk: json!("sending") }));
        c.handle_event(event(ticket, StreamEventKind::Output { chunk: json!("sent") }));
        c.handle_event(event(ticket, StreamEventKind::Finished));

        assert!(c.stream_finished());
        assert_eq!(c.stream_output(), &[json!("sending"), json!("sent")]);
        assert_eq!(c.edit_field("to", json!("z@x.com")), Err(InboxError::AlreadyResolved));
        assert_eq!(c.submit().unwrap_err(), InboxError::AlreadyResolved);
    }

    #[test]
    fn first_output_counts_as_acknowledgement() {
        let (mut c, _service) = coordinator(everything());
        c.select(SubmissionMethod::Accept).unwrap();
        let ticket = c.submit().unwrap();

        c.handle_event(event(ticket, StreamEventKind::Output { chunk: json!(1) }));
        assert_eq!(c.state(), &SubmissionState::Streaming);
    }

    #[test]
    fn duplicate_ack_and_events_after_finish_are_discarded() {
        let (mut c, _service) = coordinator(everything());
        c.select(SubmissionMethod::Accept).unwrap();
        let ticket = c.submit().unwrap();
        c.handle_event(event(ticket, StreamEventKind::Acknowledged));

        assert_eq!(
            c.handle_event(event(ticket, StreamEventKind::Acknowledged)),
            EventDisposition::Discarded(DiscardReason::UnexpectedInState)
        );

        c.handle_event(event(ticket, StreamEventKind::Finished));
        assert_eq!(
            c.handle_event(event(ticket, StreamEventKind::Failed { reason: "late".to_string() })),
            EventDisposition::Discarded(DiscardReason::UnexpectedInState)
        );
        assert!(c.stream_finished());
    }

    #[test]
    fn transport_failure_moves_to_failed_and_resubmit_revalidates() {
        let (mut c, service) = coordinator(edit_only());
        c.edit_field("to", json!("b@x.com")).unwrap();
        service.fail_next("connection refused");

        let err = c.submit().unwrap_err();
        assert_eq!(err, InboxError::TransportFailure { reason: "connection refused".to_string() });
        assert_eq!(c.failure_reason(), Some("connection refused"));

        // Reverting while failed makes the next submit fail validation fresh.
        c.revert_field("to").unwrap();
        assert!(matches!(c.submit(), Err(InboxError::NothingToSubmit { .. })));
        assert!(c.failure_reason().is_some());

        c.edit_field("to", json!("c@x.com")).unwrap();
        let ticket = c.submit().unwrap();
        assert_eq!(ticket.attempt, 2);
        assert_eq!(c.state(), &SubmissionState::Submitting);
        assert_eq!(service.sent().len(), 1);
    }

    #[test]
    fn events_from_earlier_attempt_are_discarded() {
        let (mut c, _service) = coordinator(everything());
        c.select(SubmissionMethod::Accept).unwrap();
        let first = c.submit().unwrap();
        c.handle_event(event(first, StreamEventKind::Failed { reason: "timeout".to_string() }));

        let second = c.submit().unwrap();
        assert_ne!(first, second);

        assert_eq!(
            c.handle_event(event(first, StreamEventKind::Finished)),
            EventDisposition::Discarded(DiscardReason::SupersededAttempt)
        );
        assert_eq!(c.state(), &SubmissionState::Submitting);
    }

    #[test]
    fn new_descriptor_while_streaming_resets_and_discards_late_events() {
        let (mut c, _service) = coordinator(edit_only());
        c.edit_field("to", json!("b@x.com")).unwrap();
        let ticket_a = c.submit().unwrap();
        c.handle_event(event(ticket_a, StreamEventKind::Acknowledged));
        let id_a = c.interrupt_id();

        let mut args = Map::new();
        args.insert("title".to_string(), json!("Bug"));
        let descriptor_b = InterruptDescriptor::new(
            "create_issue",
            args,
            InterruptConfig { allow_accept: true, ..InterruptConfig::default() },
        );
        let id_b = c.receive(descriptor_b);

        assert_ne!(id_a, id_b);
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert_eq!(c.attempt(), 0);
        assert!(!c.draft().has_edited());
        assert_eq!(c.selector().selected(), Some(SubmissionMethod::Accept));
        assert!(c.last_payload().is_none());

        for kind in [
            StreamEventKind::Output { chunk: json!("late") },
            StreamEventKind::Finished,
        ] {
            assert_eq!(
                c.handle_event(event(ticket_a, kind)),
                EventDisposition::Discarded(DiscardReason::SupersededInterrupt)
            );
        }
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert!(c.stream_output().is_empty());
    }

    #[test]
    fn redelivered_descriptor_keeps_in_flight_state() {
        let (mut c, _service) = coordinator(edit_only());
        c.edit_field("to", json!("b@x.com")).unwrap();
        let ticket = c.submit().unwrap();

        let id = c.receive(send_email(edit_only()));

        assert_eq!(id, ticket.interrupt_id);
        assert_eq!(c.state(), &SubmissionState::Submitting);
        assert_eq!(
            c.handle_event(event(ticket, StreamEventKind::Finished)),
            EventDisposition::Applied
        );
    }

    #[test]
    fn identical_descriptor_after_finish_starts_fresh() {
        let (mut c, _service) = coordinator(everything());
        c.select(SubmissionMethod::Accept).unwrap();
        let ticket = c.submit().unwrap();
        c.handle_event(event(ticket, StreamEventKind::Finished));

        let id = c.receive(send_email(everything()));

        assert_ne!(id, ticket.interrupt_id);
        assert_eq!(c.state(), &SubmissionState::Idle);
    }

    #[test]
    fn event_for_unknown_interrupt_is_discarded() {
        let (mut c, _service) = coordinator(everything());
        let stranger = SubmissionTicket { interrupt_id: InterruptId::new(), attempt: 1 };
        assert_eq!(
            c.handle_event(event(stranger, StreamEventKind::Acknowledged)),
            EventDisposition::Discarded(DiscardReason::SupersededInterrupt)
        );
    }

    #[test]
    fn validator_rejection_blocks_dispatch() {
        let service = MockService::default();
        let mut c = SubmissionCoordinator::new(send_email(edit_only()), Box::new(service.clone()))
            .with_validator(Box::new(DomainValidator));

        c.edit_field("to", json!("b@x.com")).unwrap();
        match c.submit() {
            Err(InboxError::InvalidArguments { reason }) => assert!(reason.contains("b@x.com")),
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert!(service.sent().is_empty());

        c.edit_field("to", json!("b@example.com")).unwrap();
        c.submit().unwrap();
        assert_eq!(service.sent().len(), 1);
    }

    #[test]
    fn validator_is_skipped_for_payloads_without_arguments() {
        let service = MockService::default();
        let mut c = SubmissionCoordinator::new(send_email(everything()), Box::new(service.clone()))
            .with_validator(Box::new(DomainValidator));
        c.select(SubmissionMethod::Accept).unwrap();
        c.submit().unwrap();
        assert_eq!(service.sent().len(), 1);
    }

    #[test]
    fn thread_id_travels_with_the_request() {
        let service = MockService::default();
        let mut c = SubmissionCoordinator::new(send_email(everything()), Box::new(service.clone()))
            .with_thread_id(Some(ThreadId::new("thread-42")));
        c.select(SubmissionMethod::Ignore).unwrap();
        c.submit().unwrap();

        assert_eq!(service.sent()[0].thread_id, Some(ThreadId::new("thread-42")));
    }

    // ── Inbound routing ──────────────────────────────────────────────────────

    #[test]
    fn tool_error_warns_and_keeps_current_interrupt() {
        let (mut c, _service) = coordinator(everything());
        c.edit_field("to", json!("b@x.com")).unwrap();
        let before = c.interrupt_id();
        let sink = RecordingSink::default();

        let mut error = ToolErrorInterrupt::new("send_email", "SMTP relay refused");
        error.can_retry = Some(true);
        error.retry_after_ms = Some(500);
        let routed = c.receive_inbound(InboundInterrupt::ToolError(error), &sink);

        assert_eq!(routed, None);
        assert_eq!(c.interrupt_id(), before);
        assert!(c.draft().has_edited(), "draft survives a tool error");
        let warnings = sink.warnings.borrow();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].title, "send_email failed");
        assert!(warnings[0].message.contains("500 ms"));
    }

    #[test]
    fn message_warns_and_review_installs() {
        let (mut c, _service) = coordinator(everything());
        let first = c.interrupt_id();
        let sink = RecordingSink::default();

        let message = InboundInterrupt::Message("user_id is required to run send_email".into());
        assert_eq!(c.receive_inbound(message, &sink), None);
        assert_eq!(c.interrupt_id(), first);

        let auth = InterruptDescriptor::authorization("https://auth.example.com/start");
        let installed = c
            .receive_inbound(InboundInterrupt::Review(auth), &sink)
            .unwrap();

        assert_ne!(installed, first);
        assert!(c.descriptor().is_authorization());
        assert_eq!(sink.warnings.borrow().len(), 1);
    }
}
