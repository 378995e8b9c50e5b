//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub:
//! - `GET /repos/{owner}/{repo}` for the access check
//! - `GET /repos/{owner}/{repo}/compare/{from}...{to}` for ranges
//! - `GET /repos/{owner}/{repo}/commits/{sha}` for commit details and diffs
//! - `GET /repos/{owner}/{repo}/tags` and `/releases`, paginated
//! - `GET /repos/{owner}/{repo}/commits/{sha}/pulls` for PR association
//!
//! # Pagination
//!
//! Listings request 100 items per page and follow the `Link` header's
//! `rel="next"` URL until the host stops sending one.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` when limits are hit. There is no
//! automatic retry; every error aborts the run.
//!
//! # Example
//!
//! ```ignore
//! use relnotes::forge::github::GitHubForge;
//! use relnotes::forge::Forge;
//!
//! let forge = GitHubForge::new("ghp_xxx", "octocat", "hello-world");
//! forge.validate_access().await?;
//! let shas = forge.compare("v1.0.0", "v1.1.0").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::debug;

use super::traits::{Forge, ForgeError, PullRequestInfo, Release, Tag};
use crate::core::types::{ChangeKind, CommitRecord, FileDelta};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "relnotes-cli";

/// Page size for paginated listings (GitHub's maximum).
const PER_PAGE: u32 = 100;

/// Page size requested from the compare endpoint.
const COMPARE_PER_PAGE: u32 = 250;

/// GitHub forge implementation.
///
/// Holds a static token; the token is sent as a bearer credential on
/// every request and never refreshed.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token or app token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge against the public API.
    ///
    /// # Example
    ///
    /// ```
    /// use relnotes::forge::github::GitHubForge;
    ///
    /// let forge = GitHubForge::new("ghp_xxx", "octocat", "hello-world");
    /// assert_eq!(forge.owner(), "octocat");
    /// assert_eq!(forge.repo(), "hello-world");
    /// ```
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`).
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_base, self.owner, self.repo)
        } else {
            format!(
                "{}/repos/{}/{}/{}",
                self.api_base, self.owner, self.repo, path
            )
        }
    }

    /// Issue a GET and decode the body, returning the next page URL if any.
    async fn get_page<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
    ) -> Result<(T, Option<String>), ForgeError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let next = next_page_url(response.headers());
        let body = self.handle_response(response).await?;
        Ok((body, next))
    }

    /// Issue a GET and decode the body.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ForgeError> {
        self.get_page(url).await.map(|(body, _)| body)
    }

    /// Follow `rel="next"` links from `first_url`, concatenating every page.
    async fn get_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        first_url: String,
    ) -> Result<Vec<T>, ForgeError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next {
            let (page, next_url): (Vec<T>, _) = self.get_page(&url).await?;
            items.extend(page);
            next = next_url;
        }
        Ok(items)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // Extract permission headers before consuming response body.
        let headers = response.headers();
        let required_permissions = header_string(headers, "X-Accepted-GitHub-Permissions");
        let required_scopes = header_string(headers, "X-Accepted-OAuth-Scopes");
        let rate_limit_exhausted = header_string(headers, "X-RateLimit-Remaining")
            .map(|remaining| remaining == "0")
            .unwrap_or(false);

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limit_exhausted => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);

                // GitHub Apps report fine-grained permissions, classic tokens report scopes
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                } else if let Some(scopes) = required_scopes.filter(|s| !s.is_empty()) {
                    err_msg.push_str(&format!(" [required scopes: {}]", scopes));
                }

                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn validate_access(&self) -> Result<(), ForgeError> {
        // Any JSON body proves access; its contents are unused.
        let _: IgnoredAny = self.get_json(&self.repo_url("")).await?;
        Ok(())
    }

    async fn compare(&self, from: &str, to: &str) -> Result<Vec<String>, ForgeError> {
        let url = format!(
            "{}?per_page={}",
            self.repo_url(&format!("compare/{}...{}", from, to)),
            COMPARE_PER_PAGE
        );
        let comparison: GitHubComparison = self.get_json(&url).await?;
        debug!(
            from,
            to,
            commits = comparison.commits.len(),
            "compared refs"
        );
        Ok(comparison.commits.into_iter().map(|c| c.sha).collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, ForgeError> {
        let commit: GitHubCommit = self.get_json(&self.repo_url(&format!("commits/{}", sha))).await?;
        commit.try_into()
    }

    async fn commit_date(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError> {
        let commit: GitHubCommitDates =
            self.get_json(&self.repo_url(&format!("commits/{}", sha))).await?;
        commit
            .commit
            .committer
            .and_then(|c| c.date)
            .ok_or_else(|| ForgeError::ApiError {
                status: 200,
                message: format!("commit {} has no committer date", sha),
            })
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError> {
        let url = format!("{}?per_page={}", self.repo_url("tags"), PER_PAGE);
        let tags: Vec<GitHubTag> = self.get_all_pages(url).await?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        let url = format!("{}?per_page={}", self.repo_url("releases"), PER_PAGE);
        let releases: Vec<GitHubRelease> = self.get_all_pages(url).await?;
        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<PullRequestInfo>, ForgeError> {
        let url = self.repo_url(&format!("commits/{}/pulls", sha));
        let pulls: Vec<GitHubPull> = self.get_json(&url).await?;
        Ok(pulls.into_iter().map(PullRequestInfo::from).collect())
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Compare endpoint response.
#[derive(Deserialize)]
struct GitHubComparison {
    commits: Vec<GitHubShaRef>,
}

/// Any object that only needs its hash.
#[derive(Deserialize)]
struct GitHubShaRef {
    sha: String,
}

/// Full commit response.
#[derive(Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubGitCommit,
    /// Linked GitHub account; absent when the email matches no user
    author: Option<GitHubUser>,
    stats: Option<GitHubStats>,
    #[serde(default)]
    files: Vec<GitHubFile>,
}

/// The git-level part of a commit response.
#[derive(Deserialize)]
struct GitHubGitCommit {
    message: String,
    author: Option<GitHubGitActor>,
    committer: Option<GitHubGitActor>,
}

/// Commit response trimmed to the committer date.
#[derive(Deserialize)]
struct GitHubCommitDates {
    commit: GitHubCommitterOnly,
}

#[derive(Deserialize)]
struct GitHubCommitterOnly {
    committer: Option<GitHubGitActor>,
}

/// Git author or committer signature.
#[derive(Deserialize)]
struct GitHubGitActor {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

/// GitHub account.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

/// Aggregate commit stats.
#[derive(Deserialize)]
struct GitHubStats {
    additions: u32,
    deletions: u32,
}

/// File entry of a commit response.
#[derive(Deserialize)]
struct GitHubFile {
    filename: String,
    status: String,
    additions: u32,
    deletions: u32,
    patch: Option<String>,
}

/// Tag list item.
#[derive(Deserialize)]
struct GitHubTag {
    name: String,
    commit: GitHubShaRef,
}

/// Release list item.
#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String,
    name: Option<String>,
    body: Option<String>,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    author: Option<GitHubUser>,
    draft: bool,
    prerelease: bool,
}

/// Pull request list item.
#[derive(Deserialize)]
struct GitHubPull {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    user: Option<GitHubUser>,
    merged_at: Option<String>,
}

impl TryFrom<GitHubCommit> for CommitRecord {
    type Error = ForgeError;

    fn try_from(gh: GitHubCommit) -> Result<Self, Self::Error> {
        let git_author = gh.commit.author;
        let timestamp = git_author
            .as_ref()
            .and_then(|a| a.date)
            .or_else(|| gh.commit.committer.as_ref().and_then(|c| c.date))
            .ok_or_else(|| ForgeError::ApiError {
                status: 200,
                message: format!("commit {} has no date", gh.sha),
            })?;

        // Prefer the GitHub login, fall back to the git author name
        let author = match gh.author {
            Some(user) => user.login,
            None => git_author.and_then(|a| a.name).unwrap_or_default(),
        };

        let (additions, deletions) = gh
            .stats
            .map(|s| (s.additions, s.deletions))
            .unwrap_or((0, 0));

        let files = gh
            .files
            .into_iter()
            .map(|f| FileDelta {
                kind: ChangeKind::from_status(&f.status),
                path: f.filename,
                additions: f.additions,
                deletions: f.deletions,
                patch: f.patch.filter(|p| !p.is_empty()),
            })
            .collect();

        Ok(CommitRecord {
            sha: gh.sha,
            message: gh.commit.message,
            author,
            timestamp,
            files,
            additions,
            deletions,
        })
    }
}

impl From<GitHubTag> for Tag {
    fn from(gh: GitHubTag) -> Self {
        Tag {
            name: gh.name,
            commit_sha: gh.commit.sha,
        }
    }
}

impl From<GitHubRelease> for Release {
    fn from(gh: GitHubRelease) -> Self {
        Release {
            tag_name: gh.tag_name,
            name: gh.name.unwrap_or_default(),
            published_at: gh.published_at,
            created_at: gh.created_at,
            body: gh.body.unwrap_or_default(),
            author: gh.author.map(|a| a.login).unwrap_or_default(),
            draft: gh.draft,
            prerelease: gh.prerelease,
        }
    }
}

impl From<GitHubPull> for PullRequestInfo {
    fn from(gh: GitHubPull) -> Self {
        PullRequestInfo {
            number: gh.number,
            title: gh.title,
            author: gh.user.map(|u| u.login).unwrap_or_default(),
            body: gh.body.unwrap_or_default(),
            url: gh.html_url,
            merged: gh.merged_at.is_some(),
        }
    }
}

// --------------------------------------------------------------------------
// Header Parsing
// --------------------------------------------------------------------------

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract the `rel="next"` URL from a `Link` header.
///
/// # Example
///
/// ```
/// use relnotes::forge::github::parse_next_link;
///
/// let link = r#"<https://api.github.com/repos/o/r/tags?page=2>; rel="next", <https://api.github.com/repos/o/r/tags?page=5>; rel="last""#;
/// assert_eq!(
///     parse_next_link(link).as_deref(),
///     Some("https://api.github.com/repos/o/r/tags?page=2")
/// );
/// assert_eq!(parse_next_link(r#"<https://x/?page=1>; rel="prev""#), None);
/// ```
pub fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(|t| t.to_string())
    })
}

fn next_page_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_next_link)
}
