//! Which resolution method the reviewer has chosen.
//!
//! The selector only records intent. Switching from `edit` to `accept` does
//! not wipe the draft; it changes which parts of the draft the outgoing
//! payload carries (see `SubmissionCoordinator::submit`).

use tracing::debug;

use inbox_contracts::{
    error::{InboxError, InboxResult},
    interrupt::{InterruptConfig, InterruptDescriptor},
    response::SubmissionMethod,
};

/// Order in which a default method is picked when an interrupt arrives.
const DEFAULT_PREFERENCE: [SubmissionMethod; 4] = [
    SubmissionMethod::Edit,
    SubmissionMethod::Accept,
    SubmissionMethod::Respond,
    SubmissionMethod::Ignore,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSelector {
    config: InterruptConfig,
    selected: Option<SubmissionMethod>,
}

impl MethodSelector {
    pub fn new(descriptor: &InterruptDescriptor) -> Self {
        let config = descriptor.config;
        let selected = DEFAULT_PREFERENCE
            .into_iter()
            .find(|m| config.permits(*m));
        Self { config, selected }
    }

    /// Choose `method`.
    ///
    /// Fails with `UnsupportedMethod` when the interrupt does not permit it;
    /// the previous selection is kept.
    pub fn select(&mut self, method: SubmissionMethod) -> InboxResult<()> {
        if !self.config.permits(method) {
            return Err(InboxError::UnsupportedMethod { method });
        }
        debug!(from = ?self.selected, to = %method, "submission method selected");
        self.selected = Some(method);
        Ok(())
    }

    pub fn selected(&self) -> Option<SubmissionMethod> {
        self.selected
    }

    pub fn permits(&self, method: SubmissionMethod) -> bool {
        self.config.permits(method)
    }

    pub fn permitted(&self) -> Vec<SubmissionMethod> {
        self.config.permitted_methods()
    }

    pub fn supports_multiple_methods(&self) -> bool {
        self.config.supports_multiple_methods()
    }
}
