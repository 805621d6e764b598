//! # inbox-verify
//!
//! Validation of reviewer-edited arguments for the agent inbox.
//!
//! This crate provides [`engine::SchemaArgumentValidator`], which implements
//! the [`inbox_core::traits::ArgumentValidator`] trait. Edited arguments are
//! checked in two phases:
//!
//! 1. **Structural**: JSON Schema validation against the interrupt's
//!    `args_schema` via the `jsonschema` crate.
//! 2. **Semantic**: rules registered per action name by the hosting
//!    application.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use inbox_verify::engine::SchemaArgumentValidator;
//!
//! let mut validator = SchemaArgumentValidator::new();
//! validator.register_rule("send_email", Box::new(|args| {
//!     match args.get("to").and_then(|v| v.as_str()) {
//!         Some(to) if to.contains('@') => None,
//!         _ => Some("recipient must be an email address".to_string()),
//!     }
//! }));
//! let coordinator = coordinator.with_validator(Box::new(validator));
//! ```

pub mod engine;

pub use engine::SchemaArgumentValidator;
