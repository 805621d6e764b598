//! # inbox-studio
//!
//! Session configuration and presentation glue around the interrupt
//! coordinator.
//!
//! ## Overview
//!
//! - [`StudioConfig`]: deployment URL, thread id, and studio origin, loaded
//!   from TOML.
//! - [`StudioLinker`] / [`build_studio_url`]: deep links into the external
//!   studio. A missing deployment URL is reported through a
//!   [`WarningSink`](inbox_core::traits::WarningSink), never as a hard error.
//! - [`PanelVisibility`]: the two independent panel toggles.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use inbox_studio::{StudioConfig, StudioLinker};
//!
//! let config = StudioConfig::from_file(Path::new("inbox.toml"))?;
//! if let Some(url) = StudioLinker::from_config(&config).open(&config, &toasts) {
//!     println!("{url}");
//! }
//! ```

pub mod config;
pub mod link;
pub mod panels;

pub use config::{StudioConfig, DEFAULT_STUDIO_ORIGIN};
pub use link::{build_studio_url, StudioLinker};
pub use panels::PanelVisibility;

// ── Tests ─────────────────────────────────────────────────────────────────────
