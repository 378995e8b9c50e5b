//! Property-based tests for core invariants.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use relnotes::core::summary::count_diff_lines;
use relnotes::core::timeline::{build_segments, merge_reference_points, DatedTag};
use relnotes::core::types::{CommitRange, DateWindow, RefKind};
use relnotes::forge::mock::MockForge;
use relnotes::forge::Release;
use relnotes::llm::prompt::{
    parse_changelog_response, ChangelogEntry, ChangelogResult, Categories,
};
use relnotes::ui::markdown::{render_changelog, RenderOptions};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Strategy for ref names without dots.
fn ref_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_/-]{1,20}"
}

/// Strategy for (name index, day offset) pairs.
fn dated_names() -> impl Strategy<Value = Vec<(u8, i64)>> {
    prop::collection::vec((0u8..12, 0i64..120), 0..20)
}

fn release(name: &str, date: DateTime<Utc>, draft: bool) -> Release {
    Release {
        tag_name: name.to_string(),
        name: name.to_string(),
        published_at: Some(date),
        created_at: date,
        body: String::new(),
        author: String::new(),
        draft,
        prerelease: false,
    }
}

fn options(min_score: f64) -> RenderOptions {
    RenderOptions {
        repo_owner: "octocat".into(),
        repo_name: "hello".into(),
        include_authors: true,
        include_dates: false,
        show_scores: true,
        min_score,
    }
}

proptest! {
    #[test]
    fn range_parse_keeps_both_sides(from in ref_name(), to in ref_name()) {
        let range = CommitRange::parse(&format!("{}..{}", from, to)).unwrap();
        prop_assert_eq!(range.from(), from.as_str());
        prop_assert_eq!(range.to(), to.as_str());
        prop_assert_eq!(range.to_string(), format!("{}..{}", from, to));
    }

    #[test]
    fn merged_points_are_in_window_sorted_and_unique(
        tags in dated_names(),
        releases in prop::collection::vec((0u8..12, 0i64..120, any::<bool>()), 0..20),
    ) {
        let window = DateWindow::parse("2024-01-15", "2024-03-15").unwrap();
        let tags: Vec<DatedTag> = tags
            .into_iter()
            .map(|(n, d)| DatedTag { name: format!("v{}", n), date: base() + Duration::days(d) })
            .collect();
        let releases: Vec<Release> = releases
            .into_iter()
            .map(|(n, d, draft)| release(&format!("v{}", n), base() + Duration::days(d), draft))
            .collect();

        let points = merge_reference_points(&tags, &releases, &window);

        for point in &points {
            prop_assert!(window.contains(point.date));
        }
        for pair in points.windows(2) {
            prop_assert!((pair[0].date, &pair[0].name) <= (pair[1].date, &pair[1].name));
            prop_assert_ne!(&pair[0].name, &pair[1].name);
        }
        let mut names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), points.len());

        // A published release in the window always wins over a same-named tag
        for point in &points {
            let has_release = releases
                .iter()
                .any(|r| r.tag_name == point.name && !r.draft && window.contains(r.date()));
            prop_assert_eq!(point.kind == RefKind::Release, has_release);
        }
    }

    #[test]
    fn n_points_make_n_minus_one_chained_segments(count in 0usize..8) {
        let window = DateWindow::parse("2024-01-01", "2024-12-31").unwrap();
        let mut forge = MockForge::new();
        let mut releases = Vec::new();
        for i in 0..count {
            releases.push(release(&format!("v{}", i), base() + Duration::days(i as i64 * 7), false));
            if i > 0 {
                forge = forge.with_comparison(&format!("v{}", i - 1), &format!("v{}", i), &[]);
            }
        }
        let points = merge_reference_points(&[], &releases, &window);

        let segments = tokio_test::block_on(build_segments(&forge, &points)).unwrap();

        prop_assert_eq!(segments.len(), count.saturating_sub(1));
        for pair in segments.windows(2) {
            prop_assert_eq!(&pair[0].to, &pair[1].from);
        }
    }

    #[test]
    fn diff_counts_exclude_headers(added in 0usize..30, removed in 0usize..30, context in 0usize..10) {
        let mut lines = vec!["--- a/file.rs".to_string(), "+++ b/file.rs".to_string(), "@@ -1 +1 @@".to_string()];
        lines.extend((0..added).map(|i| format!("+added {}", i)));
        lines.extend((0..context).map(|i| format!(" context {}", i)));
        lines.extend((0..removed).map(|i| format!("-removed {}", i)));

        let stats = count_diff_lines(&lines.join("\n"));
        prop_assert_eq!(stats.added, added);
        prop_assert_eq!(stats.removed, removed);
    }

    #[test]
    fn rendering_is_deterministic_and_filters_by_score(
        scores in prop::collection::vec(0.0f64..10.0, 1..10),
        min_score in 0.0f64..10.0,
    ) {
        let entries: Vec<ChangelogEntry> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| ChangelogEntry {
                sha: format!("{:012}", i),
                title: format!("Change {}", i),
                description: String::new(),
                author: String::new(),
                importance_score: *score,
            })
            .collect();
        let result = ChangelogResult {
            summary: "Summary.".into(),
            highlights: vec![],
            categories: vec![("Features".to_string(), entries)].into_iter().collect::<Categories>(),
        };

        let first = render_changelog(&result, "v1", "v2", &options(min_score));
        let second = render_changelog(&result, "v1", "v2", &options(min_score));
        prop_assert_eq!(&first, &second);

        let kept = scores
            .iter()
            .filter(|s| min_score <= 0.0 || **s >= min_score)
            .count();
        prop_assert_eq!(first.matches("- **Change ").count(), kept);
        prop_assert!(first.contains("## 🚀 Features"));
    }

    #[test]
    fn fenced_response_parses_like_unfenced(summary in "[a-zA-Z ]{0,40}", lang in prop_oneof![Just(""), Just("json")]) {
        let body = serde_json::json!({
            "summary": summary,
            "highlights": ["one"],
            "categories": {"Features": [{"sha": "abc", "title": "t", "description": "d", "author": "a", "importance_score": 5.0}]}
        })
        .to_string();
        let fenced = format!("```{}\n{}\n```", lang, body);

        let plain = parse_changelog_response(&body).unwrap();
        let parsed = parse_changelog_response(&fenced).unwrap();
        prop_assert_eq!(plain, parsed);
    }
}

#[test]
fn min_score_example_keeps_high_scores() {
    let entries: Vec<ChangelogEntry> = [8.5, 6.0, 9.0]
        .iter()
        .enumerate()
        .map(|(i, score)| ChangelogEntry {
            sha: format!("{:012}", i),
            title: format!("Change {}", i),
            description: String::new(),
            author: String::new(),
            importance_score: *score,
        })
        .collect();
    let result = ChangelogResult {
        summary: String::new(),
        highlights: vec![],
        categories: vec![("Features".to_string(), entries)]
            .into_iter()
            .collect::<Categories>(),
    };

    let markdown = render_changelog(&result, "v1", "v2", &options(7.0));
    assert!(markdown.contains("Change 0"));
    assert!(!markdown.contains("Change 1"));
    assert!(markdown.contains("Change 2"));
}
