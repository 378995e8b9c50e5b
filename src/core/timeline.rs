//! core::timeline
//!
//! Release discovery and segmentation over a date window.
//!
//! # Algorithm
//!
//! 1. List every tag and date it by its commit's committer date.
//! 2. List every release; drafts are dropped.
//! 3. Keep tags and releases dated inside the window (inclusive).
//! 4. Merge by name. Tags seed the map, releases with the same name
//!    overwrite them, since releases carry the richer metadata.
//! 5. Sort by date, then by name so equal dates order deterministically.
//! 6. Fetch the commit range between each adjacent pair.
//!
//! N reference points always yield exactly N-1 segments, and segment `i`
//! ends where segment `i + 1` starts.
//!
//! Steps 3-5 are the pure [`merge_reference_points`]; the network steps
//! wrap it in [`discover_reference_points`] and [`resolve_timeline`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use super::types::{DateWindow, RefKind, ReferencePoint, ReleaseSegment, DATE_FORMAT};
use crate::forge::{fetch_commit_range, Forge, ForgeError, RangeError, Release};

/// Errors from timeline resolution.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("fetch tags: {0}")]
    ListTags(ForgeError),

    #[error("get commit for tag {tag}: {source}")]
    TagDate { tag: String, source: ForgeError },

    #[error("fetch releases: {0}")]
    ListReleases(ForgeError),

    #[error("no tags or releases found between {start} and {end}")]
    NoReferences { start: String, end: String },

    #[error("get commits {from}..{to}: {source}")]
    Segment {
        from: String,
        to: String,
        source: RangeError,
    },
}

/// A tag with the date of the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedTag {
    pub name: String,
    pub date: DateTime<Utc>,
}

/// The resolved timeline: ordered reference points and the segments between them.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub points: Vec<ReferencePoint>,
    pub segments: Vec<ReleaseSegment>,
}

/// Merge tags and releases into an ordered, deduplicated point list.
///
/// Drafts are excluded and only points dated inside `window` survive.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use relnotes::core::timeline::{merge_reference_points, DatedTag};
/// use relnotes::core::types::DateWindow;
///
/// let window = DateWindow::parse("2024-01-01", "2024-12-31").unwrap();
/// let tags = vec![
///     DatedTag { name: "v2".into(), date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() },
///     DatedTag { name: "v1".into(), date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() },
///     DatedTag { name: "v0".into(), date: Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap() },
/// ];
///
/// let points = merge_reference_points(&tags, &[], &window);
/// let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, vec!["v1", "v2"]);
/// ```
pub fn merge_reference_points(
    tags: &[DatedTag],
    releases: &[Release],
    window: &DateWindow,
) -> Vec<ReferencePoint> {
    let mut by_name: BTreeMap<String, ReferencePoint> = BTreeMap::new();

    for tag in tags.iter().filter(|t| window.contains(t.date)) {
        by_name.insert(
            tag.name.clone(),
            ReferencePoint {
                name: tag.name.clone(),
                date: tag.date,
                kind: RefKind::Tag,
                prerelease: false,
            },
        );
    }

    for release in releases
        .iter()
        .filter(|r| !r.draft && window.contains(r.date()))
    {
        by_name.insert(
            release.tag_name.clone(),
            ReferencePoint {
                name: release.tag_name.clone(),
                date: release.date(),
                kind: RefKind::Release,
                prerelease: release.prerelease,
            },
        );
    }

    let mut points: Vec<ReferencePoint> = by_name.into_values().collect();
    points.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    points
}

/// Fetch tags and releases and merge them into reference points.
///
/// # Errors
///
/// - `TimelineError::NoReferences` if nothing falls inside the window
/// - listing and tag-dating failures, with the failing operation named
pub async fn discover_reference_points<F: Forge + ?Sized>(
    forge: &F,
    window: &DateWindow,
) -> Result<Vec<ReferencePoint>, TimelineError> {
    let tags = forge.list_tags().await.map_err(TimelineError::ListTags)?;

    let mut dated = Vec::with_capacity(tags.len());
    for tag in tags {
        let date = forge
            .commit_date(&tag.commit_sha)
            .await
            .map_err(|source| TimelineError::TagDate {
                tag: tag.name.clone(),
                source,
            })?;
        dated.push(DatedTag {
            name: tag.name,
            date,
        });
    }

    let releases = forge
        .list_releases()
        .await
        .map_err(TimelineError::ListReleases)?;

    debug!(
        tags = dated.len(),
        releases = releases.len(),
        "listed references"
    );

    let points = merge_reference_points(&dated, &releases, window);
    if points.is_empty() {
        return Err(TimelineError::NoReferences {
            start: window.start().format(DATE_FORMAT).to_string(),
            end: window.end().format(DATE_FORMAT).to_string(),
        });
    }
    Ok(points)
}

/// Build one segment per adjacent pair of points.
///
/// Makes exactly `points.len() - 1` range fetches, in order. The first
/// failure aborts; there are no partial results.
pub async fn build_segments<F: Forge + ?Sized>(
    forge: &F,
    points: &[ReferencePoint],
) -> Result<Vec<ReleaseSegment>, TimelineError> {
    let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
    for pair in points.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let commits = fetch_commit_range(forge, &from.name, &to.name)
            .await
            .map_err(|source| TimelineError::Segment {
                from: from.name.clone(),
                to: to.name.clone(),
                source,
            })?;
        debug!(from = %from.name, to = %to.name, commits = commits.len(), "built segment");
        segments.push(ReleaseSegment {
            from: from.clone(),
            to: to.clone(),
            commits,
        });
    }
    Ok(segments)
}

/// Discover reference points in `window` and segment the commits between them.
pub async fn resolve_timeline<F: Forge + ?Sized>(
    forge: &F,
    window: &DateWindow,
) -> Result<Timeline, TimelineError> {
    let points = discover_reference_points(forge, window).await?;
    info!(points = points.len(), "discovered reference points");
    let segments = build_segments(forge, &points).await?;
    Ok(Timeline { points, segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CommitRecord;
    use crate::forge::mock::{FailOn, MockForge, MockOperation};
    use chrono::TimeZone;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
    }

    fn tag(name: &str, date: DateTime<Utc>) -> DatedTag {
        DatedTag {
            name: name.to_string(),
            date,
        }
    }

    fn release(tag_name: &str, date: DateTime<Utc>) -> Release {
        Release {
            tag_name: tag_name.to_string(),
            name: format!("Release {}", tag_name),
            published_at: Some(date),
            created_at: date,
            body: String::new(),
            author: "bob".into(),
            draft: false,
            prerelease: false,
        }
    }

    fn window() -> DateWindow {
        DateWindow::parse("2024-01-01", "2024-12-31").unwrap()
    }

    fn commit(sha: &str) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            message: format!("commit {}", sha),
            author: "alice".into(),
            timestamp: at(1, 1),
            files: vec![],
            additions: 0,
            deletions: 0,
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn release_overrides_tag_with_same_name() {
            let mut rel = release("v1.0.0", at(3, 2));
            rel.prerelease = true;
            let points = merge_reference_points(&[tag("v1.0.0", at(3, 1))], &[rel], &window());

            assert_eq!(points.len(), 1);
            assert_eq!(points[0].kind, RefKind::Release);
            assert_eq!(points[0].date, at(3, 2));
            assert!(points[0].prerelease);
        }

        #[test]
        fn drafts_are_excluded() {
            let mut draft = release("v2.0.0", at(5, 1));
            draft.draft = true;
            let points = merge_reference_points(&[], &[draft], &window());
            assert!(points.is_empty());
        }

        #[test]
        fn draft_does_not_override_tag() {
            let mut draft = release("v2.0.0", at(5, 1));
            draft.draft = true;
            let points = merge_reference_points(&[tag("v2.0.0", at(4, 1))], &[draft], &window());
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].kind, RefKind::Tag);
        }

        #[test]
        fn out_of_window_release_keeps_tag() {
            let late = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
            let points = merge_reference_points(
                &[tag("v3.0.0", at(12, 30))],
                &[release("v3.0.0", late)],
                &window(),
            );
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].kind, RefKind::Tag);
        }

        #[test]
        fn sorted_ascending_by_date() {
            let points = merge_reference_points(
                &[tag("c", at(9, 1)), tag("a", at(1, 5))],
                &[release("b", at(4, 1))],
                &window(),
            );
            let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
        }

        #[test]
        fn equal_dates_break_ties_by_name() {
            let points = merge_reference_points(
                &[tag("v1.0.1", at(2, 2)), tag("v1.0.0-hotfix", at(2, 2))],
                &[release("v1.0.0", at(2, 2))],
                &window(),
            );
            let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["v1.0.0", "v1.0.0-hotfix", "v1.0.1"]);
        }

        #[test]
        fn window_bounds_are_inclusive() {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let end = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
            let points =
                merge_reference_points(&[tag("first", start)], &[release("last", end)], &window());
            assert_eq!(points.len(), 2);
        }

        #[test]
        fn unpublished_release_uses_created_date() {
            let mut rel = release("v1", at(6, 1));
            rel.published_at = None;
            rel.created_at = at(6, 3);
            let points = merge_reference_points(&[], &[rel], &window());
            assert_eq!(points[0].date, at(6, 3));
        }
    }

    mod resolve {
        use super::*;

        fn forge() -> MockForge {
            MockForge::new()
                .with_tag("v1.0.0", "t1")
                .with_tag("v1.1.0", "t2")
                .with_tag("v0.9.0", "t0")
                .with_commit_date("t0", Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
                .with_commit_date("t1", at(1, 10))
                .with_commit_date("t2", at(2, 10))
                .with_release(release("v1.2.0", at(3, 10)))
                .with_comparison("v1.0.0", "v1.1.0", &["a", "b"])
                .with_comparison("v1.1.0", "v1.2.0", &["c"])
                .with_commit(commit("a"))
                .with_commit(commit("b"))
                .with_commit(commit("c"))
        }

        #[tokio::test]
        async fn n_points_give_n_minus_one_chained_segments() {
            let forge = forge();
            let timeline = resolve_timeline(&forge, &window()).await.unwrap();

            assert_eq!(timeline.points.len(), 3);
            assert_eq!(timeline.segments.len(), 2);
            assert_eq!(timeline.segments[0].to, timeline.segments[1].from);
            assert_eq!(timeline.segments[0].from.name, "v1.0.0");
            assert_eq!(timeline.segments[1].to.name, "v1.2.0");
            assert_eq!(timeline.segments[0].commit_count(), 2);
            assert_eq!(timeline.segments[1].commit_count(), 1);
        }

        #[tokio::test]
        async fn one_compare_per_adjacent_pair() {
            let forge = forge();
            resolve_timeline(&forge, &window()).await.unwrap();
            let compares =
                forge.count_operations(|op| matches!(op, MockOperation::Compare { .. }));
            assert_eq!(compares, 2);
        }

        #[tokio::test]
        async fn single_point_gives_no_segments() {
            let forge = MockForge::new()
                .with_tag("v1.0.0", "t1")
                .with_commit_date("t1", at(1, 10));
            let timeline = resolve_timeline(&forge, &window()).await.unwrap();
            assert_eq!(timeline.points.len(), 1);
            assert!(timeline.segments.is_empty());
        }

        #[tokio::test]
        async fn empty_window_is_an_error() {
            let forge = forge();
            let window = DateWindow::parse("2020-01-01", "2020-12-31").unwrap();
            let err = resolve_timeline(&forge, &window).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "no tags or releases found between 2020-01-01 and 2020-12-31"
            );
        }

        #[tokio::test]
        async fn segment_failure_aborts_everything() {
            let forge = forge();
            forge.fail_on(FailOn::GetCommit("c".into(), ForgeError::RateLimited));
            let err = resolve_timeline(&forge, &window()).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "get commits v1.1.0..v1.2.0: get commit details for c: rate limited"
            );
        }

        #[tokio::test]
        async fn tag_listing_failure_is_reported() {
            let forge = forge();
            forge.fail_on(FailOn::ListTags(ForgeError::NetworkError("down".into())));
            let err = resolve_timeline(&forge, &window()).await.unwrap_err();
            assert_eq!(err.to_string(), "fetch tags: network error: down");
        }

        #[tokio::test]
        async fn release_listing_failure_is_reported() {
            let forge = forge();
            forge.fail_on(FailOn::ListReleases(ForgeError::RateLimited));
            let err = resolve_timeline(&forge, &window()).await.unwrap_err();
            assert_eq!(err.to_string(), "fetch releases: rate limited");
        }
    }
}
