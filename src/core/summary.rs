//! core::summary
//!
//! Reduces fetched commits to a compact, size-bounded form for prompts.
//!
//! # Bounds
//!
//! There is no token counting. Prompt size is bounded purely by
//! structural caps:
//! - at most [`MAX_FILE_NAMES`] file names per commit
//! - diff samples only for files changing more than
//!   [`SIGNIFICANT_CHANGE_THRESHOLD`] lines
//! - at most [`MAX_DIFF_SUMMARIES`] diff samples per commit
//! - at most [`DIFF_SAMPLE_LINES`] lines per sample

use chrono::{DateTime, Utc};

use super::types::CommitRecord;

/// File names listed per commit before the rest are elided.
pub const MAX_FILE_NAMES: usize = 20;

/// A file must change strictly more lines than this to get a diff sample.
pub const SIGNIFICANT_CHANGE_THRESHOLD: u32 = 10;

/// Diff samples kept per commit.
pub const MAX_DIFF_SUMMARIES: usize = 3;

/// Patch lines kept per diff sample.
pub const DIFF_SAMPLE_LINES: usize = 10;

/// A commit reduced for prompt inclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    /// File names, possibly ending in a synthetic "... and N more files" entry
    pub files: Vec<String>,
    /// One `path: summary` block per significant file, newline separated
    pub diff_summary: String,
    /// Aggregate stats as `+A/-D`
    pub stats: String,
}

/// Added and removed line counts of a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Summarize every commit, preserving order.
pub fn summarize_commits(commits: &[CommitRecord]) -> Vec<CommitSummary> {
    commits.iter().map(summarize_commit).collect()
}

/// Summarize a single commit.
pub fn summarize_commit(commit: &CommitRecord) -> CommitSummary {
    let mut files: Vec<String> = commit
        .files
        .iter()
        .take(MAX_FILE_NAMES)
        .map(|f| f.path.clone())
        .collect();
    if commit.files.len() > MAX_FILE_NAMES {
        files.push(format!(
            "... and {} more files",
            commit.files.len() - MAX_FILE_NAMES
        ));
    }

    let diff_summary = commit
        .files
        .iter()
        .filter(|f| f.changes() > SIGNIFICANT_CHANGE_THRESHOLD)
        .filter_map(|f| {
            let patch = f.patch.as_deref()?;
            let summary = summarize_diff(patch)?;
            Some(format!("{}: {}", f.path, summary))
        })
        .take(MAX_DIFF_SUMMARIES)
        .collect::<Vec<_>>()
        .join("\n");

    CommitSummary {
        sha: commit.sha.clone(),
        message: commit.message.clone(),
        author: commit.author.clone(),
        date: commit.timestamp,
        files,
        diff_summary,
        stats: format!("+{}/-{}", commit.additions, commit.deletions),
    }
}

/// Count added and removed lines, ignoring the `+++` / `---` file headers.
pub fn count_diff_lines(patch: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for line in patch.split('\n') {
        if line.starts_with('+') && !line.starts_with("+++") {
            stats.added += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            stats.removed += 1;
        }
    }
    stats
}

/// Summarize a patch as its line counts plus a short sample.
///
/// Returns `None` for an empty patch.
///
/// # Example
///
/// ```
/// use relnotes::core::summary::summarize_diff;
///
/// let summary = summarize_diff("+one\n+two\n-three").unwrap();
/// assert!(summary.starts_with("+2/-1 lines. Sample:\n"));
/// ```
pub fn summarize_diff(patch: &str) -> Option<String> {
    if patch.is_empty() {
        return None;
    }
    let stats = count_diff_lines(patch);
    let sample = truncate_diff(patch, DIFF_SAMPLE_LINES);
    Some(format!(
        "+{}/-{} lines. Sample:\n{}",
        stats.added, stats.removed, sample
    ))
}

/// Keep the first `max_lines` lines of a patch, noting how many were cut.
pub fn truncate_diff(patch: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = patch.split('\n').collect();
    if lines.len() <= max_lines {
        return patch.to_string();
    }
    format!(
        "{}\n... ({} more lines truncated)",
        lines[..max_lines].join("\n"),
        lines.len() - max_lines
    )
}
