//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. History (commits, comparisons, tags, releases, pull
//! requests) is seeded through builder methods and served from memory.
//! A single operation can be configured to fail, and every call is recorded
//! so tests can assert on call counts and order.
//!
//! # Example
//!
//! ```
//! use relnotes::forge::mock::MockForge;
//! use relnotes::forge::Forge;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_tag("v1.0.0", "abc123");
//!
//! let tags = forge.list_tags().await.unwrap();
//! assert_eq!(tags.len(), 1);
//! assert_eq!(tags[0].name, "v1.0.0");
//! # });
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Forge, ForgeError, PullRequestInfo, Release, Tag};
use crate::core::types::CommitRecord;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Commit details by hash.
    commits: HashMap<String, CommitRecord>,
    /// Committer dates by hash (for tag dating).
    commit_dates: HashMap<String, DateTime<Utc>>,
    /// Comparison results keyed by (from, to).
    comparisons: HashMap<(String, String), Vec<String>>,
    /// Tags in listing order.
    tags: Vec<Tag>,
    /// Releases in listing order.
    releases: Vec<Release>,
    /// Pull requests associated with each commit.
    pulls: HashMap<String, Vec<PullRequestInfo>>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail validate_access with the given error.
    ValidateAccess(ForgeError),
    /// Fail compare with the given error.
    Compare(ForgeError),
    /// Fail get_commit for one hash with the given error.
    GetCommit(String, ForgeError),
    /// Fail list_tags with the given error.
    ListTags(ForgeError),
    /// Fail list_releases with the given error.
    ListReleases(ForgeError),
    /// Fail pull_requests_for_commit with the given error.
    PullRequests(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ValidateAccess,
    Compare { from: String, to: String },
    GetCommit { sha: String },
    CommitDate { sha: String },
    ListTags,
    ListReleases,
    PullRequests { sha: String },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a commit with full details. Its committer date defaults to its timestamp.
    pub fn with_commit(self, commit: CommitRecord) -> Self {
        {
            let mut inner = self.lock();
            inner
                .commit_dates
                .entry(commit.sha.clone())
                .or_insert(commit.timestamp);
            inner.commits.insert(commit.sha.clone(), commit);
        }
        self
    }

    /// Set the committer date of a commit without full details.
    pub fn with_commit_date(self, sha: &str, date: DateTime<Utc>) -> Self {
        self.lock().commit_dates.insert(sha.to_string(), date);
        self
    }

    /// Define the result of comparing `from` with `to`.
    pub fn with_comparison(self, from: &str, to: &str, shas: &[&str]) -> Self {
        self.lock().comparisons.insert(
            (from.to_string(), to.to_string()),
            shas.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Add a tag pointing at a commit.
    pub fn with_tag(self, name: &str, commit_sha: &str) -> Self {
        self.lock().tags.push(Tag {
            name: name.to_string(),
            commit_sha: commit_sha.to_string(),
        });
        self
    }

    /// Add a release.
    pub fn with_release(self, release: Release) -> Self {
        self.lock().releases.push(release);
        self
    }

    /// Associate a pull request with a commit.
    pub fn with_pull_request(self, sha: &str, pr: PullRequestInfo) -> Self {
        self.lock()
            .pulls
            .entry(sha.to_string())
            .or_default()
            .push(pr);
        self
    }

    /// Configure an operation to fail.
    pub fn fail_on(&self, fail: FailOn) {
        self.lock().fail_on = Some(fail);
    }

    /// Clear any configured failure.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Count recorded operations matching a predicate.
    pub fn count_operations(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        self.lock().operations.iter().filter(|op| pred(op)).count()
    }

    fn record(&self, op: MockOperation) {
        self.lock().operations.push(op);
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn validate_access(&self) -> Result<(), ForgeError> {
        self.record(MockOperation::ValidateAccess);
        if let Some(FailOn::ValidateAccess(err)) = &self.lock().fail_on {
            return Err(err.clone());
        }
        Ok(())
    }

    async fn compare(&self, from: &str, to: &str) -> Result<Vec<String>, ForgeError> {
        self.record(MockOperation::Compare {
            from: from.to_string(),
            to: to.to_string(),
        });
        let inner = self.lock();
        if let Some(FailOn::Compare(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner
            .comparisons
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("{}...{}", from, to)))
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, ForgeError> {
        self.record(MockOperation::GetCommit {
            sha: sha.to_string(),
        });
        let inner = self.lock();
        if let Some(FailOn::GetCommit(failing, err)) = &inner.fail_on {
            if failing == sha {
                return Err(err.clone());
            }
        }
        inner
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", sha)))
    }

    async fn commit_date(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError> {
        self.record(MockOperation::CommitDate {
            sha: sha.to_string(),
        });
        self.lock()
            .commit_dates
            .get(sha)
            .copied()
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", sha)))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError> {
        self.record(MockOperation::ListTags);
        let inner = self.lock();
        if let Some(FailOn::ListTags(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.tags.clone())
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        self.record(MockOperation::ListReleases);
        let inner = self.lock();
        if let Some(FailOn::ListReleases(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.releases.clone())
    }

    async fn pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<PullRequestInfo>, ForgeError> {
        self.record(MockOperation::PullRequests {
            sha: sha.to_string(),
        });
        let inner = self.lock();
        if let Some(FailOn::PullRequests(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.pulls.get(sha).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn commit(sha: &str) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            message: format!("commit {}", sha),
            author: "alice".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            files: vec![],
            additions: 0,
            deletions: 0,
        }
    }

    #[tokio::test]
    async fn serves_seeded_comparison() {
        let forge = MockForge::new().with_comparison("v1", "v2", &["a", "b"]);
        let shas = forge.compare("v1", "v2").await.unwrap();
        assert_eq!(shas, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn unknown_comparison_is_not_found() {
        let forge = MockForge::new();
        assert!(matches!(
            forge.compare("v1", "v2").await,
            Err(ForgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn commit_date_defaults_to_timestamp() {
        let forge = MockForge::new().with_commit(commit("abc"));
        let date = forge.commit_date("abc").await.unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn fail_on_get_commit_targets_one_hash() {
        let forge = MockForge::new()
            .with_commit(commit("good"))
            .with_commit(commit("bad"));
        forge.fail_on(FailOn::GetCommit("bad".into(), ForgeError::RateLimited));

        assert!(forge.get_commit("good").await.is_ok());
        assert!(matches!(
            forge.get_commit("bad").await,
            Err(ForgeError::RateLimited)
        ));

        forge.clear_fail_on();
        assert!(forge.get_commit("bad").await.is_ok());
    }

    #[tokio::test]
    async fn records_operations_in_order() {
        let forge = MockForge::new();
        let _ = forge.validate_access().await;
        let _ = forge.list_tags().await;
        let _ = forge.list_releases().await;

        assert_eq!(
            forge.operations(),
            vec![
                MockOperation::ValidateAccess,
                MockOperation::ListTags,
                MockOperation::ListReleases
            ]
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let forge = MockForge::new();
        let clone = forge.clone();
        let _ = clone.list_tags().await;
        assert_eq!(forge.count_operations(|op| *op == MockOperation::ListTags), 1);
    }
}
