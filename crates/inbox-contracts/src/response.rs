//! Resolution methods and the finalized response payload.
//!
//! `SubmissionPayload` is a tagged variant so that illegal combinations
//! (arguments attached to an accept, say) cannot be constructed. On the wire
//! it is flattened to `{ method, editedArguments?, freeformResponse? }`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InboxError;

/// How the reviewer resolves an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMethod {
    /// Run the action exactly as proposed.
    Accept,
    /// Run the action with reviewer-edited arguments.
    Edit,
    /// Send free-form text back to the agent instead of running the action.
    Respond,
    /// Skip the action.
    Ignore,
}

impl SubmissionMethod {
    pub const ALL: [SubmissionMethod; 4] = [
        SubmissionMethod::Accept,
        SubmissionMethod::Edit,
        SubmissionMethod::Respond,
        SubmissionMethod::Ignore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionMethod::Accept => "accept",
            SubmissionMethod::Edit => "edit",
            SubmissionMethod::Respond => "respond",
            SubmissionMethod::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for SubmissionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The finalized response handed to the resumable-execution service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum SubmissionPayload {
    Accept,
    Ignore,
    Edit(Map<String, Value>),
    Respond(String),
    /// Edited arguments plus a free-form note, when the interrupt allows both.
    /// `selected` is the method the reviewer chose: `edit` or `respond`.
    EditAndRespond {
        selected: SubmissionMethod,
        args: Map<String, Value>,
        text: String,
    },
}

impl SubmissionPayload {
    /// The method reported on the wire. Combined payloads report the method
    /// the reviewer selected.
    pub fn method(&self) -> SubmissionMethod {
        match self {
            SubmissionPayload::Accept => SubmissionMethod::Accept,
            SubmissionPayload::Ignore => SubmissionMethod::Ignore,
            SubmissionPayload::Edit(_) => SubmissionMethod::Edit,
            SubmissionPayload::Respond(_) => SubmissionMethod::Respond,
            SubmissionPayload::EditAndRespond { selected, .. } => *selected,
        }
    }

    pub fn edited_arguments(&self) -> Option<&Map<String, Value>> {
        match self {
            SubmissionPayload::Edit(args) | SubmissionPayload::EditAndRespond { args, .. } => {
                Some(args)
            }
            _ => None,
        }
    }

    pub fn freeform_response(&self) -> Option<&str> {
        match self {
            SubmissionPayload::Respond(text) | SubmissionPayload::EditAndRespond { text, .. } => {
                Some(text)
            }
            _ => None,
        }
    }
}

/// Flat wire form of `SubmissionPayload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub method: SubmissionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_arguments: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_response: Option<String>,
}

impl From<SubmissionPayload> for WireResponse {
    fn from(payload: SubmissionPayload) -> Self {
        let method = payload.method();
        let (edited_arguments, freeform_response) = match payload {
            SubmissionPayload::Accept | SubmissionPayload::Ignore => (None, None),
            SubmissionPayload::Edit(args) => (Some(args), None),
            SubmissionPayload::Respond(text) => (None, Some(text)),
            SubmissionPayload::EditAndRespond { args, text, .. } => (Some(args), Some(text)),
        };
        WireResponse {
            method,
            edited_arguments,
            freeform_response,
        }
    }
}

impl TryFrom<WireResponse> for SubmissionPayload {
    type Error = InboxError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        let method = wire.method;
        let malformed = |reason: &str| InboxError::MalformedResponse {
            reason: format!("{method}: {reason}"),
        };

        match (method, wire.edited_arguments, wire.freeform_response) {
            (SubmissionMethod::Accept, None, None) => Ok(SubmissionPayload::Accept),
            (SubmissionMethod::Ignore, None, None) => Ok(SubmissionPayload::Ignore),
            (SubmissionMethod::Accept | SubmissionMethod::Ignore, _, _) => {
                Err(malformed("must not carry arguments or a response"))
            }
            (SubmissionMethod::Edit, Some(args), None) => Ok(SubmissionPayload::Edit(args)),
            (SubmissionMethod::Respond, None, Some(text)) => Ok(SubmissionPayload::Respond(text)),
            (
                selected @ (SubmissionMethod::Edit | SubmissionMethod::Respond),
                Some(args),
                Some(text),
            ) => Ok(SubmissionPayload::EditAndRespond {
                selected,
                args,
                text,
            }),
            (SubmissionMethod::Edit, None, _) => Err(malformed("missing editedArguments")),
            (SubmissionMethod::Respond, _, None) => Err(malformed("missing freeformResponse")),
        }
    }
}
