//! forge::range
//!
//! Fetch a commit range with full details.
//!
//! One compare call lists the hashes, then each commit is fetched in order.
//! Every failure names the operation and identifier that failed; the first
//! failure aborts the whole range.

use thiserror::Error;
use tracing::debug;

use super::traits::{Forge, ForgeError};
use crate::core::types::CommitRecord;

/// Errors from fetching a commit range.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("compare commits {from}..{to}: {source}")]
    Compare {
        from: String,
        to: String,
        source: ForgeError,
    },

    #[error("get commit details for {sha}: {source}")]
    CommitDetails { sha: String, source: ForgeError },
}

/// Fetch every commit between `from` and `to`, with diffs.
///
/// Returns exactly one record per commit in the host's comparison, in the
/// same order.
pub async fn fetch_commit_range<F: Forge + ?Sized>(
    forge: &F,
    from: &str,
    to: &str,
) -> Result<Vec<CommitRecord>, RangeError> {
    let shas = forge
        .compare(from, to)
        .await
        .map_err(|source| RangeError::Compare {
            from: from.to_string(),
            to: to.to_string(),
            source,
        })?;

    debug!(from, to, count = shas.len(), "fetching commit details");

    let mut commits = Vec::with_capacity(shas.len());
    for sha in shas {
        let commit = forge
            .get_commit(&sha)
            .await
            .map_err(|source| RangeError::CommitDetails {
                sha: sha.clone(),
                source,
            })?;
        commits.push(commit);
    }
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ChangeKind, FileDelta};
    use crate::forge::mock::{FailOn, MockForge, MockOperation};
    use chrono::{TimeZone, Utc};

    fn commit(sha: &str, files: Vec<FileDelta>) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            message: format!("commit {}", sha),
            author: "alice".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            files,
            additions: 1,
            deletions: 0,
        }
    }

    fn readme() -> FileDelta {
        FileDelta {
            path: "README.md".into(),
            kind: ChangeKind::Modified,
            additions: 1,
            deletions: 0,
            patch: Some("+hello".into()),
        }
    }

    #[tokio::test]
    async fn one_record_per_compared_commit() {
        let forge = MockForge::new()
            .with_comparison("v1", "v2", &["a", "b", "c"])
            .with_commit(commit("a", vec![readme()]))
            .with_commit(commit("b", vec![]))
            .with_commit(commit("c", vec![readme()]));

        let commits = fetch_commit_range(&forge, "v1", "v2").await.unwrap();
        let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["a", "b", "c"]);
        assert!(commits[1].files.is_empty());
        assert_eq!(commits[0].files.len(), 1);
    }

    #[tokio::test]
    async fn empty_range_is_ok_and_empty() {
        let forge = MockForge::new().with_comparison("v1", "v1", &[]);
        let commits = fetch_commit_range(&forge, "v1", "v1").await.unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn compare_failure_names_range() {
        let forge = MockForge::new();
        forge.fail_on(FailOn::Compare(ForgeError::NotFound("ref".into())));
        let err = fetch_commit_range(&forge, "v1", "v2").await.unwrap_err();
        assert_eq!(err.to_string(), "compare commits v1..v2: not found: ref");
    }

    #[tokio::test]
    async fn detail_failure_aborts_and_names_sha() {
        let forge = MockForge::new()
            .with_comparison("v1", "v2", &["a", "b", "c"])
            .with_commit(commit("a", vec![]))
            .with_commit(commit("b", vec![]))
            .with_commit(commit("c", vec![]));
        forge.fail_on(FailOn::GetCommit("b".into(), ForgeError::RateLimited));

        let err = fetch_commit_range(&forge, "v1", "v2").await.unwrap_err();
        assert_eq!(err.to_string(), "get commit details for b: rate limited");

        // Nothing after the failing commit is fetched
        let fetched = forge.count_operations(|op| matches!(op, MockOperation::GetCommit { .. }));
        assert_eq!(fetched, 2);
    }
}
