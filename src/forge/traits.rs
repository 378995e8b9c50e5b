//! forge::traits
//!
//! Forge trait definition for reading history from a remote hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors. Callers await each
//! call before issuing the next; nothing here is fetched concurrently.
//!
//! The trait exposes host primitives only (compare, commit detail, tag and
//! release listings). Composite operations such as fetching a whole commit
//! range with diffs live in [`super::range`] and [`crate::core::timeline`]
//! so they can attach context to failures and run against [`super::mock`].
//!
//! # Example
//!
//! ```ignore
//! use relnotes::forge::{Forge, ForgeError};
//!
//! async fn newest_release(forge: &dyn Forge) -> Result<Option<String>, ForgeError> {
//!     let releases = forge.list_releases().await?;
//!     Ok(releases.into_iter().find(|r| !r.draft).map(|r| r.tag_name))
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::CommitRecord;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A tag as listed by the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Hash of the tagged commit
    pub commit_sha: String,
}

/// A release as listed by the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag the release points at
    pub tag_name: String,
    /// Display name (may be empty)
    pub name: String,
    /// Publish time; drafts have none
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Release notes body
    pub body: String,
    /// Login of the publishing user
    pub author: String,
    /// Whether the release is an unpublished draft
    pub draft: bool,
    /// Whether the release is marked as a pre-release
    pub prerelease: bool,
}

impl Release {
    /// Effective date of the release: publish time, falling back to creation.
    pub fn date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// A pull request associated with a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Author login
    pub author: String,
    /// PR description (may be empty)
    pub body: String,
    /// Web URL for viewing
    pub url: String,
    /// Whether the PR has been merged
    pub merged: bool,
}

/// The Forge trait for reading repository history from a hosting service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a forge can be held across
/// `.await` points on the runtime.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Every error is fatal to
/// the current run; callers add context and propagate.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Check that the repository exists and the credentials can read it.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `NotFound` if the repository does not exist (or is invisible)
    async fn validate_access(&self) -> Result<(), ForgeError>;

    /// List the hashes of commits reachable from `to` but not `from`,
    /// oldest first, as the host's comparison reports them.
    ///
    /// # Errors
    ///
    /// - `NotFound` if either ref does not exist
    async fn compare(&self, from: &str, to: &str) -> Result<Vec<String>, ForgeError>;

    /// Fetch a commit with its stats and per-file patches.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the commit does not exist
    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, ForgeError>;

    /// Fetch the committer date of a commit.
    ///
    /// Used to date tags, which carry no date of their own.
    async fn commit_date(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError>;

    /// List every tag, following pagination until exhausted.
    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError>;

    /// List every release (drafts included), following pagination.
    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError>;

    /// List the pull requests associated with a commit.
    async fn pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<PullRequestInfo>, ForgeError>;
}
