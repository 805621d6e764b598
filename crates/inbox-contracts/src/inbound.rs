//! Values the upstream service raises when a run pauses.
//!
//! Three shapes arrive on the same channel:
//!
//! - a reviewable interrupt object (`action_request` + `config`), alone or
//!   in a list;
//! - a tool error object (`error` + `tool`, plus optional retry hints);
//! - a plain message string. The authorization prompt
//!   `"Please use the following link to authorize: <url>"` is turned into an
//!   accept-only authorization interrupt; any other string stays a message.
//!
//! Tool errors from the service stringify `can_retry` and `retry_after_ms`
//! (`"True"`, `"1500"`); both native and stringified forms are accepted.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::{InboxError, InboxResult},
    interrupt::InterruptDescriptor,
    notice::UserWarning,
};

/// Prefix of the message raised when a tool needs the user to authorize it.
pub const AUTHORIZE_LINK_PREFIX: &str = "Please use the following link to authorize:";

/// A tool run that failed and paused the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolErrorInterrupt {
    pub error: String,
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_prompt_content: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub can_retry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_after_ms: Option<u64>,
}

impl ToolErrorInterrupt {
    pub fn new(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            tool: tool.into(),
            additional_prompt_content: None,
            can_retry: None,
            developer_message: None,
            retry_after_ms: None,
        }
    }

    /// Absent `can_retry` means the tool did not say; treated as no.
    pub fn is_retryable(&self) -> bool {
        self.can_retry == Some(true)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_ms.map(Duration::from_millis)
    }

    /// The notice shown to the reviewer. `developer_message` is left out.
    pub fn notice(&self) -> UserWarning {
        let mut message = self.error.clone();
        if let Some(extra) = &self.additional_prompt_content {
            message.push(' ');
            message.push_str(extra);
        }
        if self.is_retryable() {
            match self.retry_after_ms {
                Some(ms) => message.push_str(&format!(" Retry after {ms} ms.")),
                None => message.push_str(" The tool can be retried."),
            }
        }
        UserWarning::new(format!("{} failed", self.tool), message)
    }
}

/// One value raised by the upstream service.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundInterrupt {
    /// Needs a reviewer decision.
    Review(InterruptDescriptor),
    ToolError(ToolErrorInterrupt),
    /// Free text with nothing to decide, e.g. a missing user id.
    Message(String),
}

impl InboundInterrupt {
    /// Parse the interrupt value emitted by the upstream service.
    ///
    /// Accepts one value or a list of them. An empty list, a scalar other
    /// than a string, or an object of neither known shape is
    /// `MalformedInterrupt`.
    pub fn parse_all(value: &Value) -> InboxResult<Vec<InboundInterrupt>> {
        match value {
            Value::Array(items) if items.is_empty() => Err(InboxError::MalformedInterrupt {
                reason: "interrupt list is empty".to_string(),
            }),
            Value::Array(items) => items.iter().map(Self::parse_one).collect(),
            other => Ok(vec![Self::parse_one(other)?]),
        }
    }

    fn parse_one(value: &Value) -> InboxResult<InboundInterrupt> {
        match value {
            Value::String(text) => Ok(Self::from_message(text)),
            Value::Object(map) if map.contains_key("action_request") => {
                from_value(value).map(InboundInterrupt::Review)
            }
            Value::Object(map) if map.contains_key("error") && map.contains_key("tool") => {
                from_value(value).map(InboundInterrupt::ToolError)
            }
            Value::Object(map) => Err(InboxError::MalformedInterrupt {
                reason: format!(
                    "unrecognized interrupt object with keys [{}]",
                    map.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            }),
            other => Err(InboxError::MalformedInterrupt {
                reason: format!("expected an object, array, or string, got {other}"),
            }),
        }
    }

    fn from_message(text: &str) -> InboundInterrupt {
        match text.strip_prefix(AUTHORIZE_LINK_PREFIX).map(str::trim) {
            Some(url) if !url.is_empty() => {
                InboundInterrupt::Review(InterruptDescriptor::authorization(url))
            }
            _ => InboundInterrupt::Message(text.to_string()),
        }
    }

    pub fn into_review(self) -> Option<InterruptDescriptor> {
        match self {
            InboundInterrupt::Review(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Notice for values that carry nothing to review.
    pub fn notice(&self) -> Option<UserWarning> {
        match self {
            InboundInterrupt::Review(_) => None,
            InboundInterrupt::ToolError(error) => Some(error.notice()),
            InboundInterrupt::Message(text) => Some(UserWarning::new("Interrupted", text.clone())),
        }
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> InboxResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| InboxError::MalformedInterrupt {
        reason: e.to_string(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("invalid boolean '{s}'"))),
        },
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a boolean, got {other}"
        ))),
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid duration {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid duration '{s}'"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected milliseconds, got {other}"
        ))),
    }
}
