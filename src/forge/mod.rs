//! forge
//!
//! Abstraction for remote forges (GitHub).
//!
//! # Architecture
//!
//! The `Forge` trait defines the read-only interface the changelog engine
//! needs from a hosting service. The engine is generic over it, so tests
//! run against [`mock::MockForge`] and production runs against
//! [`github::GitHubForge`].
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait, listing types and `ForgeError`
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - [`range`]: Commit range fetching with contextual errors
//!
//! # Example
//!
//! ```ignore
//! use relnotes::forge::github::GitHubForge;
//! use relnotes::forge::fetch_commit_range;
//!
//! let forge = GitHubForge::new(token, "octocat", "hello-world");
//! let commits = fetch_commit_range(&forge, "v1.0.0", "v1.1.0").await?;
//! println!("{} commits", commits.len());
//! ```

pub mod github;
pub mod mock;
pub mod range;
mod traits;

pub use range::{fetch_commit_range, RangeError};
pub use traits::*;
