//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`markdown`] - Changelog rendering (pure)
//! - [`output`] - Progress and status output
//! - [`prompts`] - Interactive prompts and confirmations
//!
//! # Design
//!
//! All human-facing output goes through this module so quiet and verbose
//! modes are honored in one place. The changelog text itself is produced
//! by [`markdown`] and written by the engine.

pub mod markdown;
pub mod output;
pub mod prompts;
