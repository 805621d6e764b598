//! Transient user-facing notices.

use serde::{Deserialize, Serialize};

/// A short, non-fatal message for the reviewer (toast-style).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWarning {
    pub title: String,
    pub message: String,
}

impl UserWarning {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Shown when a studio link is requested without a deployment URL.
    pub fn missing_deployment_url() -> Self {
        Self::new(
            "Error",
            "Please set the LangGraph deployment URL in settings.",
        )
    }
}
