//! ui::markdown
//!
//! Pure functions rendering changelogs as GitHub-flavored markdown.
//!
//! # Design
//!
//! Every function here takes immutable inputs and returns a string, with
//! no side effects. Identical inputs give byte-identical output.
//!
//! # Layouts
//!
//! - [`render_changelog`]: one range, `##` category sections
//! - [`render_timeline`]: one `##` section per release, newest first, with
//!   a raw commit list and `###` category sections
//! - [`render_pr_timeline`]: one `##` section per release listing merged
//!   pull requests with their model-written summaries
//!
//! # Category order
//!
//! Known categories follow the vocabulary's fixed precedence. Categories
//! the vocabulary does not know follow, in the order the model listed them.
//! Categories that are missing or empty are skipped.
//!
//! # Example Output
//!
//! ```markdown
//! # Changelog: v1.0.0 → v1.1.0
//!
//! ## 🚀 Features
//!
//! - **Add login** ([`0123456`](https://github.com/o/r/commit/0123456789)) by @alice
//!   Users can now sign in.
//! ```

use crate::core::config::{ConfigError, Settings};
use crate::core::types::{DateWindow, ReleaseSegment, DATE_FORMAT};
use crate::forge::PullRequestInfo;
use crate::llm::prompt::{ChangelogEntry, ChangelogResult, PrSummary, Vocabulary};

/// Hash characters shown in rendered links.
pub const DISPLAY_SHA_LEN: usize = 7;

/// Glyph for categories without an emoji.
pub const UNKNOWN_CATEGORY_EMOJI: &str = "•";

/// Rendering switches, taken from settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub repo_owner: String,
    pub repo_name: String,
    pub include_authors: bool,
    pub include_dates: bool,
    pub show_scores: bool,
    pub min_score: f64,
}

impl RenderOptions {
    /// Options for the repository and flags in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let (owner, repo) = settings.require_repository()?;
        Ok(Self {
            repo_owner: owner.to_string(),
            repo_name: repo.to_string(),
            include_authors: settings.include_authors,
            include_dates: settings.include_dates,
            show_scores: settings.show_scores,
            min_score: settings.min_score,
        })
    }
}

/// One release's model output, for timeline rendering.
#[derive(Debug, Clone)]
pub struct ReleaseSection {
    pub segment: ReleaseSegment,
    /// `None` for segments without commits, which skip the model.
    pub result: Option<ChangelogResult>,
}

/// One release's pull requests and summaries.
#[derive(Debug, Clone)]
pub struct PrReleaseSection {
    pub segment: ReleaseSegment,
    pub pull_requests: Vec<PullRequestInfo>,
    pub summaries: Vec<PrSummary>,
}

/// Emoji for a category name, or the generic bullet for names outside
/// `vocabulary`.
pub fn category_emoji(category: &str, vocabulary: Vocabulary) -> &'static str {
    if !vocabulary.contains(category) {
        return UNKNOWN_CATEGORY_EMOJI;
    }
    match category {
        "Breaking Changes" => "💥",
        "Features" => "🚀",
        "Improvements" => "⚡",
        "Bug Fixes" => "🐛",
        "Documentation" => "📚",
        "Internal" => "🔧",
        "New Features" => "✨",
        "Enhancements" => "💎",
        "Performance" => "🏎️",
        "Dependencies" => "📦",
        "Refactoring" => "♻️",
        "Testing" => "🧪",
        "CI/CD" => "👷",
        "Other" => "📝",
        _ => UNKNOWN_CATEGORY_EMOJI,
    }
}

/// Colored dot for an importance score.
pub fn score_badge(score: f64) -> &'static str {
    if score >= 9.0 {
        "🔴"
    } else if score >= 7.0 {
        "🟠"
    } else if score >= 5.0 {
        "🟡"
    } else if score >= 3.0 {
        "🟢"
    } else {
        "⚪"
    }
}

/// Web URL of a commit.
pub fn commit_url(owner: &str, repo: &str, sha: &str) -> String {
    format!("https://github.com/{}/{}/commit/{}", owner, repo, sha)
}

/// Leading characters of a hash, or the whole hash if shorter.
fn display_sha(sha: &str) -> &str {
    crate::core::types::short_sha(sha, DISPLAY_SHA_LEN)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Non-empty categories of `result` in rendering order.
pub fn ordered_categories<'a>(
    result: &'a ChangelogResult,
    vocabulary: Vocabulary,
) -> Vec<(&'a str, &'a [ChangelogEntry])> {
    let known = vocabulary
        .names()
        .into_iter()
        .filter_map(|name| result.categories.iter().find(|(category, _)| *category == name));
    let unknown = result
        .categories
        .iter()
        .filter(|(category, _)| !vocabulary.contains(category));

    known
        .chain(unknown)
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

/// Render a ref-mode changelog.
pub fn render_changelog(
    result: &ChangelogResult,
    from: &str,
    to: &str,
    options: &RenderOptions,
) -> String {
    let mut lines = vec![format!("# Changelog: {} → {}", from, to), String::new()];

    if !result.summary.is_empty() {
        lines.push("## Summary".to_string());
        lines.push(String::new());
        lines.push(result.summary.clone());
        lines.push(String::new());
    }

    if !result.highlights.is_empty() {
        lines.push("## Highlights".to_string());
        lines.push(String::new());
        push_highlights(&mut lines, &result.highlights);
        lines.push(String::new());
    }

    push_categories(&mut lines, result, Vocabulary::Standard, "##", options);

    finish(lines)
}

/// Render a timeline changelog, newest release first.
pub fn render_timeline(
    window: &DateWindow,
    releases: &[ReleaseSection],
    options: &RenderOptions,
) -> String {
    let mut lines = timeline_header(window, releases.len(), options);

    for release in releases.iter().rev() {
        let segment = &release.segment;
        push_release_heading(&mut lines, segment, plural(segment.commit_count(), "commit"));

        let result = match &release.result {
            Some(result) if !segment.commits.is_empty() => result,
            _ => {
                lines.push("_No commits in this release._".to_string());
                lines.push(String::new());
                continue;
            }
        };

        if !result.summary.is_empty() {
            lines.push(result.summary.clone());
            lines.push(String::new());
        }

        if !result.highlights.is_empty() {
            lines.push("**Highlights**".to_string());
            lines.push(String::new());
            push_highlights(&mut lines, &result.highlights);
            lines.push(String::new());
        }

        lines.push("**Commits**".to_string());
        lines.push(String::new());
        for commit in &segment.commits {
            let mut line = format!("- `{}` {}", display_sha(&commit.sha), commit.subject());
            if !commit.author.is_empty() {
                line.push_str(&format!(" (@{})", commit.author));
            }
            if options.include_dates {
                line.push_str(&format!(" — {}", commit.timestamp.format(DATE_FORMAT)));
            }
            lines.push(line);
        }
        lines.push(String::new());

        push_categories(&mut lines, result, Vocabulary::Extended, "###", options);
    }

    finish(lines)
}

/// Render a pull-request timeline, newest release first.
///
/// PRs without a matching summary are listed without one.
pub fn render_pr_timeline(
    window: &DateWindow,
    releases: &[PrReleaseSection],
    options: &RenderOptions,
) -> String {
    let mut lines = timeline_header(window, releases.len(), options);

    for release in releases.iter().rev() {
        push_release_heading(
            &mut lines,
            &release.segment,
            plural(release.pull_requests.len(), "pull request"),
        );

        for pr in &release.pull_requests {
            let mut line = format!("- **{}** ([#{}]({}))", pr.title, pr.number, pr.url);
            if options.include_authors && !pr.author.is_empty() {
                line.push_str(&format!(" by @{}", pr.author));
            }
            lines.push(line);

            let summary = release
                .summaries
                .iter()
                .find(|s| s.number == pr.number)
                .map(|s| s.summary.trim())
                .unwrap_or_default();
            for text in summary.lines().filter(|l| !l.is_empty()) {
                lines.push(format!("  {}", text));
            }
            lines.push(String::new());
        }
    }

    finish(lines)
}

fn timeline_header(window: &DateWindow, releases: usize, options: &RenderOptions) -> Vec<String> {
    let mut lines = vec![
        format!("# Changelog: {}/{}", options.repo_owner, options.repo_name),
        String::new(),
        format!("_{} · {}_", window, plural(releases, "release")),
        String::new(),
    ];
    if releases == 0 {
        lines.push("_Fewer than two releases in this window; nothing to compare._".to_string());
        lines.push(String::new());
    }
    lines
}

fn push_release_heading(lines: &mut Vec<String>, segment: &ReleaseSegment, count: String) {
    let marker = if segment.to.prerelease {
        " (pre-release)"
    } else {
        ""
    };
    lines.push(format!("## {}{}", segment.to.name, marker));
    lines.push(String::new());
    lines.push(format!(
        "_{} → {} · since {} · {}_",
        segment.from.date.format(DATE_FORMAT),
        segment.to.date.format(DATE_FORMAT),
        segment.from.name,
        count
    ));
    lines.push(String::new());
}

fn push_highlights(lines: &mut Vec<String>, highlights: &[String]) {
    for highlight in highlights {
        lines.push(format!("- ⭐ {}", highlight));
    }
}

fn push_categories(
    lines: &mut Vec<String>,
    result: &ChangelogResult,
    vocabulary: Vocabulary,
    heading: &str,
    options: &RenderOptions,
) {
    // Emptiness is judged before score filtering, so a fully filtered
    // category still gets its header.
    for (category, entries) in ordered_categories(result, vocabulary) {
        lines.push(format!(
            "{} {} {}",
            heading,
            category_emoji(category, vocabulary),
            category
        ));
        lines.push(String::new());

        for entry in entries
            .iter()
            .filter(|e| options.min_score <= 0.0 || e.importance_score >= options.min_score)
        {
            push_entry(lines, entry, options);
        }
    }
}

fn push_entry(lines: &mut Vec<String>, entry: &ChangelogEntry, options: &RenderOptions) {
    let mut line = format!(
        "- **{}** ([`{}`]({}))",
        entry.title,
        display_sha(&entry.sha),
        commit_url(&options.repo_owner, &options.repo_name, &entry.sha)
    );
    if options.show_scores {
        line.push_str(&format!(
            " {} {:.1}",
            score_badge(entry.importance_score),
            entry.importance_score
        ));
    }
    if options.include_authors && !entry.author.is_empty() {
        line.push_str(&format!(" by @{}", entry.author));
    }
    lines.push(line);

    for text in entry.description.lines().filter(|l| !l.is_empty()) {
        lines.push(format!("  {}", text));
    }
    lines.push(String::new());
}

/// Join lines, ending the document with exactly one newline.
fn finish(lines: Vec<String>) -> String {
    let mut doc = lines.join("\n");
    let trimmed = doc.trim_end_matches('\n').len();
    doc.truncate(trimmed);
    doc.push('\n');
    doc
}
