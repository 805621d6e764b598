//! # inbox-ref
//!
//! Reference runtime for the agent inbox.
//!
//! Provides an in-memory resumable-execution service and scripted review
//! scenarios built from the interrupts a tool-calling agent raises:
//!
//! 1. **Edit Email**: schema-checked argument edit on an outgoing email.
//! 2. **Authorize Tool**: authorization link message turned into an
//!    accept-only interrupt, a transport failure and resubmission, then a
//!    retryable tool error surfaced as a warning.
//! 3. **Respond to Issue**: edit + free-form response combined in one payload.
//! 4. **Superseded Tweet**: a new interrupt arrives mid-stream; late events
//!    for the old one are discarded.
//! 5. **Studio Link**: deep link from TOML config, and the warning raised
//!    without a deployment URL.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod mock_data;
pub mod scenarios;
pub mod service;

pub use service::{CollectingWarnings, InMemoryResumeService};
