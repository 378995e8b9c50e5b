//! core
//!
//! Core domain types, configuration, and the pure changelog algorithms.
//!
//! # Modules
//!
//! - [`types`] - Data model: CommitRecord, ReferencePoint, DateWindow, etc.
//! - [`config`] - Configuration schema, loading and resolution
//! - [`timeline`] - Release discovery and segmentation
//! - [`summary`] - Commit summarization for prompt input
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid ranges and windows at construction
//! - Everything is built fresh per run and held in memory only
//! - Network access goes through the `Forge` trait so algorithms stay testable

pub mod config;
pub mod summary;
pub mod timeline;
pub mod types;
