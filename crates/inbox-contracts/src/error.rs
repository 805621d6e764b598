//! Error types for the interrupt review pipeline.
//!
//! Every fallible operation returns `InboxResult<T>`. Local validation errors
//! are raised before any external call; only `TransportFailure` originates
//! from the resumable-execution service.

use thiserror::Error;

use crate::response::SubmissionMethod;

/// The unified error type for the agent inbox.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InboxError {
    /// The method is not in the set the interrupt's config permits.
    #[error("method '{method}' is not permitted for this interrupt")]
    UnsupportedMethod { method: SubmissionMethod },

    /// The selected method needs draft content the reviewer has not provided.
    #[error("nothing to submit for method '{method}': {reason}")]
    NothingToSubmit {
        method: SubmissionMethod,
        reason: String,
    },

    /// A mutation or submit was attempted while a submission is in flight.
    #[error("a submission is already in progress (state: {state})")]
    SubmissionInProgress { state: String },

    /// The interrupt has already been resolved and its stream has finished.
    #[error("interrupt already resolved; waiting for the next interrupt")]
    AlreadyResolved,

    /// `submit()` was called with no method selected.
    #[error("no submission method selected")]
    NoMethodSelected,

    /// The draft has no field with this name. Keys are fixed at initialization.
    #[error("unknown argument field '{name}'")]
    UnknownField { name: String },

    /// Edited arguments failed schema or rule validation.
    #[error("edited arguments rejected: {reason}")]
    InvalidArguments { reason: String },

    /// The resumable-execution service rejected or failed to process the payload.
    ///
    /// Always recoverable by resubmitting.
    #[error("transport failure: {reason}")]
    TransportFailure { reason: String },

    /// A studio link was requested without a deployment base URL.
    #[error("deployment URL is not configured")]
    MissingDeploymentConfig,

    /// An inbound interrupt value did not match the expected shape.
    #[error("malformed interrupt: {reason}")]
    MalformedInterrupt { reason: String },

    /// A wire-form response could not be mapped onto a valid payload.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the inbox crates.
pub type InboxResult<T> = Result<T, InboxError>;
