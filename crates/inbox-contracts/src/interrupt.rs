//! Interrupt descriptor types.
//!
//! An interrupt is raised by the resumable-execution service when an agent
//! pauses before an action. The descriptor is immutable once received; the
//! coordinator copies what it needs into the draft and selector.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::response::SubmissionMethod;

/// Action name used by the upstream service for authorization interrupts.
pub const AUTH_ACTION: &str = "Auth";

/// Unique identifier for one installed interrupt.
///
/// Assigned by the coordinator when a descriptor becomes current. Stream
/// events carry it so that events for a superseded interrupt can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterruptId(pub uuid::Uuid);

impl InterruptId {
    /// Create a new, unique interrupt ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for InterruptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InterruptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the execution thread the interrupt belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The action the agent wants to take, with its proposed arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Tool or action name (e.g. "send_email", "Github_CreateIssue").
    pub action: String,
    /// Proposed arguments. Keys form the fixed schema of the response draft.
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Which resolution methods the reviewer may use for this interrupt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptConfig {
    #[serde(default)]
    pub allow_ignore: bool,
    #[serde(default)]
    pub allow_respond: bool,
    #[serde(default)]
    pub allow_edit: bool,
    #[serde(default)]
    pub allow_accept: bool,
}

impl InterruptConfig {
    /// Return true if `method` is permitted by this config.
    pub fn permits(&self, method: SubmissionMethod) -> bool {
        match method {
            SubmissionMethod::Accept => self.allow_accept,
            SubmissionMethod::Edit => self.allow_edit,
            SubmissionMethod::Respond => self.allow_respond,
            SubmissionMethod::Ignore => self.allow_ignore,
        }
    }

    /// All permitted methods, in `SubmissionMethod::ALL` order.
    pub fn permitted_methods(&self) -> Vec<SubmissionMethod> {
        SubmissionMethod::ALL
            .into_iter()
            .filter(|m| self.permits(*m))
            .collect()
    }

    /// Edits and a free-form response may travel in one submission only when
    /// both are allowed.
    pub fn supports_multiple_methods(&self) -> bool {
        self.allow_edit && self.allow_respond
    }
}

/// Immutable description of a paused action, supplied by the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterruptDescriptor {
    pub action_request: ActionRequest,
    pub config: InterruptConfig,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON Schema for the action's arguments, when the tool publishes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_schema: Option<Value>,
}

impl InterruptDescriptor {
    /// Build a descriptor for `action` with the given arguments and config.
    pub fn new(
        action: impl Into<String>,
        args: Map<String, Value>,
        config: InterruptConfig,
    ) -> Self {
        Self {
            action_request: ActionRequest {
                action: action.into(),
                args,
            },
            config,
            description: None,
            args_schema: None,
        }
    }

    /// The accept-only interrupt raised when a tool needs the user to
    /// authorize access at `url` before it can run.
    pub fn authorization(url: impl Into<String>) -> Self {
        let mut args = Map::new();
        args.insert("url".to_string(), Value::String(url.into()));
        Self::new(
            AUTH_ACTION,
            args,
            InterruptConfig {
                allow_accept: true,
                ..InterruptConfig::default()
            },
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_args_schema(mut self, schema: Value) -> Self {
        self.args_schema = Some(schema);
        self
    }

    pub fn is_authorization(&self) -> bool {
        self.action_request.action == AUTH_ACTION
    }
}
