//! llm::prompt
//!
//! The changelog request/response protocol.
//!
//! # Requests
//!
//! [`build_changelog_prompt`] lists every commit (short hash, author, date,
//! message, files, stats, diff samples) and asks for a categorized JSON
//! changelog. [`build_pr_prompt`] lists pull requests and asks for one
//! sentence per PR. Both are deterministic: the same request always yields
//! the same prompt.
//!
//! # Responses
//!
//! Models often wrap JSON in a markdown fence. [`strip_code_fence`] removes
//! one leading fence (with or without a language tag) and one trailing
//! fence, then the remainder is parsed strictly. Malformed JSON is an
//! error; there is no repair.
//!
//! # Category order
//!
//! `categories` is a JSON object whose key order carries meaning for
//! categories outside the vocabulary. [`Categories`] keeps keys in the
//! order the model wrote them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::traits::LlmError;
use crate::core::summary::CommitSummary;
use crate::core::types::{short_sha, DATE_FORMAT};
use crate::forge::PullRequestInfo;

/// Hash characters shown per commit in prompts.
pub const PROMPT_SHA_LEN: usize = 8;

/// Characters of a PR body kept in prompts.
pub const PR_BODY_LIMIT: usize = 500;

static STANDARD_CATEGORIES: [(&str, &str); 6] = [
    ("Breaking Changes", "Changes that break backward compatibility"),
    ("Features", "New functionality or capabilities"),
    ("Improvements", "Enhancements to existing features"),
    ("Bug Fixes", "Bug fixes and error corrections"),
    ("Documentation", "Documentation updates"),
    ("Internal", "Internal changes, refactoring, or dependencies"),
];

static EXTENDED_CATEGORIES: [(&str, &str); 8] = [
    ("New Features", "Brand-new user-facing capabilities"),
    ("Enhancements", "Refinements to existing behavior"),
    ("Performance", "Speed or resource usage improvements"),
    ("Dependencies", "Dependency additions, upgrades, or removals"),
    ("Refactoring", "Code restructuring without behavior change"),
    ("Testing", "Test additions and fixes"),
    ("CI/CD", "Build, release, and pipeline changes"),
    ("Other", "Changes that fit no other category"),
];

/// The category names a model may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// The six ref-mode categories.
    Standard,
    /// The six plus eight finer-grained timeline categories.
    Extended,
}

impl Vocabulary {
    /// `(name, definition)` pairs in rendering precedence order.
    pub fn categories(self) -> impl Iterator<Item = (&'static str, &'static str)> {
        let extra: &'static [(&'static str, &'static str)] = match self {
            Vocabulary::Standard => &[],
            Vocabulary::Extended => &EXTENDED_CATEGORIES,
        };
        STANDARD_CATEGORIES.iter().chain(extra.iter()).copied()
    }

    /// Category names in rendering precedence order.
    pub fn names(self) -> Vec<&'static str> {
        self.categories().map(|(name, _)| name).collect()
    }

    /// Whether `name` belongs to this vocabulary.
    pub fn contains(self, name: &str) -> bool {
        self.categories().any(|(known, _)| known == name)
    }
}

/// Input for a commit-based changelog request.
#[derive(Debug, Clone)]
pub struct ChangelogRequest {
    /// `owner/repo`
    pub repository: String,
    pub from: String,
    pub to: String,
    pub commits: Vec<CommitSummary>,
}

/// Input for a pull-request summary request.
#[derive(Debug, Clone)]
pub struct PrChangelogRequest {
    /// `owner/repo`
    pub repository: String,
    pub from: String,
    pub to: String,
    pub pull_requests: Vec<PullRequestInfo>,
}

/// One model-written changelog line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChangelogEntry {
    pub sha: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    /// 0-10, higher is more significant
    #[serde(default, deserialize_with = "null_as_default")]
    pub importance_score: f64,
}

/// Categories in the order the model listed them.
///
/// Duplicate keys keep their first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories(Vec<(String, Vec<ChangelogEntry>)>);

impl Categories {
    /// Entries for `name`, if the category was returned.
    pub fn get(&self, name: &str) -> Option<&[ChangelogEntry]> {
        self.0
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, entries)| entries.as_slice())
    }

    /// `(name, entries)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ChangelogEntry])> {
        self.0
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<ChangelogEntry>)> for Categories {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ChangelogEntry>)>>(iter: I) -> Self {
        let mut categories = Categories::default();
        for (name, entries) in iter {
            if categories.get(&name).is_none() {
                categories.0.push((name, entries));
            }
        }
        categories
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to entry lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Categories, A::Error> {
                let mut pairs = Vec::new();
                while let Some((name, entries)) =
                    map.next_entry::<String, Option<Vec<ChangelogEntry>>>()?
                {
                    pairs.push((name, entries.unwrap_or_default()));
                }
                Ok(pairs.into_iter().collect())
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

/// A parsed changelog for one range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChangelogResult {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Categories,
}

/// A one-sentence summary of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrSummary {
    pub number: u64,
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrSummaryResponse {
    #[serde(deserialize_with = "null_as_default")]
    entries: Vec<PrSummary>,
}

/// Read an explicit `null` as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build the changelog prompt for `request` using `vocabulary`.
pub fn build_changelog_prompt(request: &ChangelogRequest, vocabulary: Vocabulary) -> String {
    let mut lines = vec![
        "You are a technical writer creating a changelog for a software release.".to_string(),
        String::new(),
        format!("Repository: {}", request.repository),
        format!("Range: {} → {}", request.from, request.to),
        String::new(),
        format!("Total commits: {}", request.commits.len()),
        String::new(),
        "Commits (oldest first):".to_string(),
        "---".to_string(),
        String::new(),
    ];

    for (i, commit) in request.commits.iter().enumerate() {
        lines.push(format!(
            "{}. Commit: {}",
            i + 1,
            short_sha(&commit.sha, PROMPT_SHA_LEN)
        ));
        lines.push(format!("   Author: {}", commit.author));
        lines.push(format!("   Date: {}", commit.date.format(DATE_FORMAT)));
        lines.push(format!("   Message: {}", commit.message));
        if !commit.files.is_empty() {
            lines.push(format!("   Files: {}", commit.files.join(", ")));
        }
        if !commit.stats.is_empty() {
            lines.push(format!("   Stats: {}", commit.stats));
        }
        if !commit.diff_summary.is_empty() {
            lines.push(format!("   Changes: {}", commit.diff_summary));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("Generate a structured changelog with:".to_string());
    lines.push(String::new());
    lines.push("1. **Categories**: Organize commits into these categories:".to_string());
    for (name, definition) in vocabulary.categories() {
        lines.push(format!("   - {}: {}", name, definition));
    }
    lines.push(String::new());
    lines.push("2. **For each commit**:".to_string());
    lines.push("   - title: Concise, user-facing title (max 80 chars)".to_string());
    lines.push("   - description: Brief explanation of the impact (1-2 sentences)".to_string());
    lines.push("   - Include the SHA and author".to_string());
    lines.push(
        "   - importance_score: 0-10 user-facing significance (9-10 major feature or breaking \
         change, 7-8 notable improvement or important fix, 5-6 moderate change, 3-4 minor \
         change, 0-2 trivial or internal)"
            .to_string(),
    );
    lines.push(String::new());
    lines.push(
        "3. **Top highlights**: Select 3-5 most important changes across all categories"
            .to_string(),
    );
    lines.push(String::new());
    lines.push("4. **Release summary**: Write 2-3 sentences summarizing this release".to_string());
    lines.push(String::new());
    lines.push("Output ONLY valid JSON with this structure:".to_string());
    lines.push("{".to_string());
    lines.push("  \"summary\": \"2-3 sentence release summary\",".to_string());
    lines.push("  \"highlights\": [\"highlight 1\", \"highlight 2\", \"highlight 3\"],".to_string());
    lines.push("  \"categories\": {".to_string());
    lines.push(
        "    \"Features\": [{\"sha\": \"abc12345\", \"title\": \"...\", \"description\": \"...\", \
         \"author\": \"...\", \"importance_score\": 8.5}],"
            .to_string(),
    );
    lines.push("    \"Bug Fixes\": [...],".to_string());
    lines.push("    ...".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.push("Important:".to_string());
    lines.push("- Only include categories that have commits".to_string());
    lines.push("- Write from the user's perspective (what changed for them)".to_string());
    lines.push("- Be concise and clear".to_string());
    lines.push("- Use the exact category names listed above".to_string());
    lines.push("- Output ONLY the JSON, no additional text".to_string());

    lines.join("\n")
}

/// Build the pull-request summary prompt.
pub fn build_pr_prompt(request: &PrChangelogRequest) -> String {
    let mut lines = vec![
        "You are a technical writer creating release notes from merged pull requests.".to_string(),
        String::new(),
        format!("Repository: {}", request.repository),
        format!("Release: {} → {}", request.from, request.to),
        String::new(),
        format!("Total pull requests: {}", request.pull_requests.len()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for pr in &request.pull_requests {
        lines.push(format!("PR #{}: {}", pr.number, pr.title));
        lines.push(format!("   Author: {}", pr.author));
        let body = truncate_body(pr.body.trim(), PR_BODY_LIMIT);
        if !body.is_empty() {
            lines.push(format!("   Description: {}", body));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(
        "For each pull request, write ONE sentence describing the change from the user's \
         perspective."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Output ONLY valid JSON with this structure:".to_string());
    lines.push("{".to_string());
    lines.push("  \"entries\": [{\"number\": 123, \"summary\": \"One sentence.\"}]".to_string());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.push("Important:".to_string());
    lines.push("- Include every pull request listed above exactly once".to_string());
    lines.push("- Use the PR number as given".to_string());
    lines.push("- Output ONLY the JSON, no additional text".to_string());

    lines.join("\n")
}

/// Keep at most `limit` characters, appending `...` when cut.
pub fn truncate_body(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Remove one surrounding markdown code fence, if present.
///
/// # Example
///
/// ```
/// use relnotes::llm::prompt::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
/// assert_eq!(strip_code_fence("  {}  "), "{}");
/// ```
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // The tag may be followed by a newline or, on one-line replies,
        // directly by the JSON value.
        let tagged = rest.trim_start_matches([' ', '\t']);
        let tag_end = tagged
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(tagged.len());
        let body = tagged[tag_end..].trim_start_matches([' ', '\t', '\r']);
        text = match body.strip_prefix('\n') {
            Some(next) => next,
            None if body.starts_with(['{', '[']) => body,
            None => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a changelog completion.
///
/// # Errors
///
/// `LlmError::Parse` if the text is not a changelog JSON object after
/// fence removal.
pub fn parse_changelog_response(raw: &str) -> Result<ChangelogResult, LlmError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| LlmError::Parse(e.to_string()))
}

/// Parse a pull-request summary completion.
pub fn parse_pr_response(raw: &str) -> Result<Vec<PrSummary>, LlmError> {
    let response: PrSummaryResponse =
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| LlmError::Parse(e.to_string()))?;
    Ok(response.entries)
}
