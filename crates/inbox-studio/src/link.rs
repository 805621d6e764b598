//! Deep links into the external studio for the thread under review.
//!
//! Link shape: `<origin>/studio/thread[/<thread_id>]?baseUrl=<deployment_url>`.

use tracing::{debug, warn};
use url::Url;

use inbox_contracts::{
    error::{InboxError, InboxResult},
    interrupt::ThreadId,
    notice::UserWarning,
};
use inbox_core::traits::WarningSink;

use crate::config::{StudioConfig, DEFAULT_STUDIO_ORIGIN};

/// Build a studio link against the default origin.
pub fn build_studio_url(base_url: Option<&str>, thread_id: Option<&ThreadId>) -> InboxResult<Url> {
    StudioLinker::new(DEFAULT_STUDIO_ORIGIN).build(base_url, thread_id)
}

/// Builds studio links against a fixed origin.
#[derive(Debug, Clone)]
pub struct StudioLinker {
    origin: String,
}

impl StudioLinker {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.studio_origin.clone())
    }

    /// Build the link for `thread_id` on the deployment at `base_url`.
    ///
    /// One trailing `/` on `base_url` is dropped. A missing or blank
    /// `base_url` is `MissingDeploymentConfig`. An origin
    /// that does not parse as an absolute URL is `ConfigError`.
    pub fn build(&self, base_url: Option<&str>, thread_id: Option<&ThreadId>) -> InboxResult<Url> {
        let base_url = base_url
            .map(str::trim)
            .map(|s| s.strip_suffix('/').unwrap_or(s))
            .filter(|s| !s.is_empty())
            .ok_or(InboxError::MissingDeploymentConfig)?;

        let mut url = Url::parse(&self.origin).map_err(|e| InboxError::ConfigError {
            reason: format!("invalid studio origin '{}': {}", self.origin, e),
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| InboxError::ConfigError {
                reason: format!("studio origin '{}' cannot carry a path", self.origin),
            })?;
            segments.pop_if_empty().push("studio").push("thread");
            if let Some(thread_id) = thread_id {
                segments.push(thread_id.as_str());
            }
        }
        url.query_pairs_mut().append_pair("baseUrl", base_url);

        debug!(url = %url, "built studio link");
        Ok(url)
    }

    /// Build the link for the session in `config`, reporting a missing
    /// deployment URL to `warnings` instead of failing.
    ///
    /// Returns `None` (and emits exactly one warning) when no link can be
    /// opened.
    pub fn open(&self, config: &StudioConfig, warnings: &dyn WarningSink) -> Option<Url> {
        let thread_id = config.thread_id();
        match self.build(config.deployment_url(), thread_id.as_ref()) {
            Ok(url) => Some(url),
            Err(InboxError::MissingDeploymentConfig) => {
                warn!("studio link requested without a deployment URL");
                warnings.warn(&UserWarning::missing_deployment_url());
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to build studio link");
                warnings.warn(&UserWarning::new("Error", e.to_string()));
                None
            }
        }
    }
}
