//! The reviewer's in-progress response for one interrupt.
//!
//! The draft starts as a copy of the proposed arguments. Its key set is fixed
//! at initialization: edits may change values but never add or remove keys.
//! `has_edited` and `has_added_response` are recomputed on every mutation and
//! cannot be set directly.

use serde_json::{Map, Value};
use tracing::debug;

use inbox_contracts::{
    error::{InboxError, InboxResult},
    interrupt::InterruptDescriptor,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDraft {
    /// Snapshot of the proposed arguments, used to compute `has_edited`.
    initial: Map<String, Value>,
    fields: Map<String, Value>,
    freeform_response: String,
    has_edited: bool,
    has_added_response: bool,
}

impl ResponseDraft {
    pub fn new(descriptor: &InterruptDescriptor) -> Self {
        let mut draft = Self::default();
        draft.initialize(descriptor);
        draft
    }

    /// Reset the draft to the descriptor's proposed arguments.
    ///
    /// Calling this twice with the same descriptor leaves no observable
    /// difference; calling it with a different one replaces everything.
    pub fn initialize(&mut self, descriptor: &InterruptDescriptor) {
        self.initial = descriptor.action_request.args.clone();
        self.fields = self.initial.clone();
        self.freeform_response.clear();
        self.has_edited = false;
        self.has_added_response = false;
    }

    /// Set `name` to `value`.
    ///
    /// Returns `UnknownField` if `name` was not among the proposed arguments.
    pub fn edit_field(&mut self, name: &str, value: Value) -> InboxResult<()> {
        let slot = self
            .fields
            .get_mut(name)
            .ok_or_else(|| InboxError::UnknownField {
                name: name.to_string(),
            })?;
        *slot = value;
        self.recompute_edited();
        debug!(field = %name, has_edited = self.has_edited, "draft field edited");
        Ok(())
    }

    /// Restore `name` to its proposed value.
    pub fn revert_field(&mut self, name: &str) -> InboxResult<()> {
        let original = self
            .initial
            .get(name)
            .cloned()
            .ok_or_else(|| InboxError::UnknownField {
                name: name.to_string(),
            })?;
        self.edit_field(name, original)
    }

    /// Restore every field to its proposed value. The free-form text is kept.
    pub fn revert_all(&mut self) {
        self.fields = self.initial.clone();
        self.recompute_edited();
    }

    pub fn set_freeform_response(&mut self, text: impl Into<String>) {
        self.freeform_response = text.into();
        self.has_added_response = !self.freeform_response.trim().is_empty();
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn initial_fields(&self) -> &Map<String, Value> {
        &self.initial
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn freeform_response(&self) -> &str {
        &self.freeform_response
    }

    pub fn has_edited(&self) -> bool {
        self.has_edited
    }

    pub fn has_added_response(&self) -> bool {
        self.has_added_response
    }

    fn recompute_edited(&mut self) {
        // serde_json::Value equality is structural, so nested objects and
        // arrays compare deeply.
        self.has_edited = self.fields != self.initial;
    }
}
