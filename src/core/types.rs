//! core::types
//!
//! Strong types for the changelog domain.
//!
//! # Types
//!
//! - [`CommitRecord`] / [`FileDelta`] - A fetched commit and its file changes
//! - [`ReferencePoint`] - A dated tag or release
//! - [`ReleaseSegment`] - The commits between two consecutive reference points
//! - [`CommitRange`] - A validated `from..to` range
//! - [`DateWindow`] - An inclusive UTC date window
//!
//! # Validation
//!
//! [`CommitRange`] and [`DateWindow`] enforce validity at construction
//! time, so the engine never sees a half-specified range.
//!
//! # Examples
//!
//! ```
//! use relnotes::core::types::{CommitRange, DateWindow};
//!
//! let range = CommitRange::parse("v1.0.0..v1.1.0").unwrap();
//! assert_eq!(range.from(), "v1.0.0");
//! assert_eq!(range.to(), "v1.1.0");
//!
//! assert!(CommitRange::parse("v1.0.0").is_err());
//! assert!(DateWindow::parse("2024-03-01", "2024-01-01").is_err());
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;
use thiserror::Error;

/// Date format accepted on the command line and in rendered output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit range format, expected 'from..to', got '{0}'")]
    InvalidRange(String),

    #[error("both 'from' and 'to' refs must be specified")]
    EmptyRangeSide,

    #[error("invalid {flag} format (expected YYYY-MM-DD): {value}")]
    InvalidDate { flag: &'static str, value: String },

    #[error("from-date must not be after to-date")]
    InvertedWindow,
}

/// How a file changed in a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeKind {
    /// Map a host-reported status string onto a change kind.
    ///
    /// GitHub reports `removed` for deletions and a few rarer statuses
    /// (`copied`, `changed`, `unchanged`) that are treated as modifications.
    pub fn from_status(status: &str) -> Self {
        match status {
            "added" => ChangeKind::Added,
            "removed" | "deleted" => ChangeKind::Deleted,
            "renamed" => ChangeKind::Renamed,
            _ => ChangeKind::Modified,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Deleted => write!(f, "deleted"),
            ChangeKind::Renamed => write!(f, "renamed"),
        }
    }
}

/// A single file changed by a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDelta {
    /// Path of the file after the change
    pub path: String,
    /// Kind of change
    pub kind: ChangeKind,
    /// Lines added
    pub additions: u32,
    /// Lines removed
    pub deletions: u32,
    /// Raw unified diff, absent for binary or oversized files
    pub patch: Option<String>,
}

impl FileDelta {
    /// Total changed lines.
    pub fn changes(&self) -> u32 {
        self.additions + self.deletions
    }
}

/// A commit with its full details, as fetched from the forge.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    /// Full commit hash
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author login, falling back to the git author name (may be empty)
    pub author: String,
    /// Author date
    pub timestamp: DateTime<Utc>,
    /// Changed files, in host order
    pub files: Vec<FileDelta>,
    /// Aggregate lines added
    pub additions: u32,
    /// Aggregate lines removed
    pub deletions: u32,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Abbreviated hash for display.
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha, 7)
    }
}

/// Truncate a hash to at most `len` characters.
///
/// Hashes shorter than `len` are returned whole.
///
/// # Example
///
/// ```
/// use relnotes::core::types::short_sha;
///
/// assert_eq!(short_sha("abc123def456", 7), "abc123d");
/// assert_eq!(short_sha("abc", 7), "abc");
/// ```
pub fn short_sha(sha: &str, len: usize) -> &str {
    match sha.char_indices().nth(len) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

/// Where a reference point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Tag,
    Release,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Tag => write!(f, "tag"),
            RefKind::Release => write!(f, "release"),
        }
    }
}

/// A named, dated marker in repository history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePoint {
    /// Tag name (releases are keyed by their tag name)
    pub name: String,
    /// Commit date for tags, publish date for releases
    pub date: DateTime<Utc>,
    /// Tag or release
    pub kind: RefKind,
    /// Whether the release is marked as a pre-release
    pub prerelease: bool,
}

/// The commits between two consecutive reference points.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSegment {
    pub from: ReferencePoint,
    pub to: ReferencePoint,
    pub commits: Vec<CommitRecord>,
}

impl ReleaseSegment {
    /// Number of commits in the segment.
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }
}

/// A validated `from..to` commit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    from: String,
    to: String,
}

impl CommitRange {
    /// Create a range from two refs.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyRangeSide` if either side is empty.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, TypeError> {
        let from = from.into();
        let to = to.into();
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(TypeError::EmptyRangeSide);
        }
        Ok(Self { from, to })
    }

    /// Parse a `from..to` expression.
    ///
    /// Exactly one `..` separator is accepted; `a...b` and `a..b..c` are rejected.
    pub fn parse(expr: &str) -> Result<Self, TypeError> {
        let parts: Vec<&str> = expr.split("..").collect();
        if parts.len() != 2 || parts[1].starts_with('.') {
            return Err(TypeError::InvalidRange(expr.to_string()));
        }
        Self::new(parts[0], parts[1])
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }
}

impl fmt::Display for CommitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// An inclusive window of calendar days, in UTC.
///
/// `start` is the first instant of the first day and `end` the last
/// instant of the last day, so a release published any time on the
/// final day is inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Create a window from two calendar days.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TypeError> {
        if from > to {
            return Err(TypeError::InvertedWindow);
        }
        let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
        let end_time = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or(NaiveTime::MIN);
        let end = Utc.from_utc_datetime(&to.and_time(end_time));
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` strings for both ends.
    ///
    /// The `to` day is included in full; the end is not that day's midnight.
    pub fn parse(from: &str, to: &str) -> Result<Self, TypeError> {
        let from = parse_date(from, "--from-date")?;
        let to = parse_date(to, "--to-date")?;
        Self::new(from, to)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Check if an instant lies inside the window (inclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(value: &str, flag: &'static str) -> Result<NaiveDate, TypeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| TypeError::InvalidDate {
        flag,
        value: value.to_string(),
    })
}
