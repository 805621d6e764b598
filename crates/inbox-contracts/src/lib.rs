//! # inbox-contracts
//!
//! Shared types, payload shapes, and error contracts for the agent inbox.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, their wire forms, and error types.

pub mod error;
pub mod inbound;
pub mod interrupt;
pub mod notice;
pub mod response;
pub mod submission;
