//! Session configuration loaded from TOML.
//!
//! Thread id and deployment URL are explicit values handed to the link
//! builder and the submission coordinator.
//!
//! Example:
//! ```toml
//! deployment_url = "https://my-agent.example.com"
//! thread_id = "5f0c1a52-7d1c-4c1e-9a0e-2f6b3c1d9e11"
//! studio_origin = "https://smith.langchain.com"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use inbox_contracts::{
    error::{InboxError, InboxResult},
    interrupt::ThreadId,
};

/// Where studio links point when no origin is configured.
pub const DEFAULT_STUDIO_ORIGIN: &str = "https://smith.langchain.com";

fn default_studio_origin() -> String {
    DEFAULT_STUDIO_ORIGIN.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Base URL of the agent deployment. Studio links need it.
    #[serde(default)]
    pub deployment_url: Option<String>,

    /// The execution thread under review, when known.
    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default = "default_studio_origin")]
    pub studio_origin: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            deployment_url: None,
            thread_id: None,
            studio_origin: default_studio_origin(),
        }
    }
}

impl StudioConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `InboxError::ConfigError` if the TOML is malformed or does not
    /// match `StudioConfig`.
    pub fn from_toml_str(s: &str) -> InboxResult<Self> {
        toml::from_str(s).map_err(|e| InboxError::ConfigError {
            reason: format!("failed to parse studio config TOML: {}", e),
        })
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> InboxResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| InboxError::ConfigError {
            reason: format!("failed to read studio config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The deployment URL, treating a blank value as absent.
    pub fn deployment_url(&self) -> Option<&str> {
        self.deployment_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The thread id, treating a blank value as absent.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.thread_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ThreadId::new)
    }
}
