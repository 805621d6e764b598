//! # inbox-core
//!
//! The interrupt response coordinator for human-in-the-loop agent review.
//!
//! This crate provides:
//! - The trait seams (`ResumeService`, `ArgumentValidator`, `WarningSink`)
//! - `ResponseDraft`, the reviewer's in-progress edits and free-form text
//! - `MethodSelector`, the chosen resolution method
//! - `SubmissionCoordinator`, which guards, dispatches, and tracks the stream
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inbox_core::{SubmissionCoordinator, traits::ResumeService};
//!
//! let mut coordinator = SubmissionCoordinator::new(descriptor, Box::new(service));
//! coordinator.edit_field("to", json!("b@x.com"))?;
//! let ticket = coordinator.submit()?;
//! // later, for each event the service delivers:
//! coordinator.handle_event(event);
//! ```

pub mod coordinator;
pub mod draft;
pub mod selector;
pub mod traits;

pub use coordinator::{finalize_payload, SubmissionCoordinator};
pub use draft::ResponseDraft;
pub use selector::MethodSelector;
