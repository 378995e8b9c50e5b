//! engine::generate
//!
//! The three generation modes.
//!
//! # Modes
//!
//! - **Ref**: one range, one model call, one document
//! - **Timeline**: discover releases in a date window, then one model call
//!   per non-empty release segment
//! - **PR timeline**: discover releases, collect the merged pull requests
//!   behind each segment's commits, one summary call per segment that has any
//!
//! Everything runs strictly in sequence; each call is awaited before the
//! next starts. The first failure aborts the run and nothing is written.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::config::{ConfigError, Settings};
use crate::core::summary::summarize_commits;
use crate::core::timeline::{resolve_timeline, TimelineError};
use crate::core::types::{CommitRange, DateWindow, ReleaseSegment};
use crate::forge::{fetch_commit_range, Forge, ForgeError, PullRequestInfo, RangeError};
use crate::llm::prompt::{ChangelogRequest, ChangelogResult, PrChangelogRequest, Vocabulary};
use crate::llm::{ChangelogClient, LanguageModel, LlmError};
use crate::ui::markdown::{
    render_changelog, render_pr_timeline, render_timeline, PrReleaseSection, ReleaseSection,
    RenderOptions,
};
use crate::ui::output::{self, Verbosity};

/// Errors from changelog generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no commits found between {from} and {to}")]
    NoCommits { from: String, to: String },

    #[error("GitHub access validation failed: {0}")]
    Access(ForgeError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("discover releases: {0}")]
    Timeline(#[from] TimelineError),

    #[error("generate changelog for {target}: {source}")]
    Model { target: String, source: LlmError },

    #[error("fetch pull requests for commit {sha}: {source}")]
    PullRequests { sha: String, source: ForgeError },

    #[error("write output file '{path}': {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// A generated ref-mode changelog.
#[derive(Debug, Clone)]
pub struct Changelog {
    pub range: CommitRange,
    /// `owner/repo`
    pub repository: String,
    pub result: ChangelogResult,
    pub markdown: String,
}

/// A generated timeline changelog.
#[derive(Debug, Clone)]
pub struct TimelineChangelog {
    pub window: DateWindow,
    pub repository: String,
    pub releases: Vec<ReleaseSection>,
    pub markdown: String,
}

/// A generated pull-request timeline.
#[derive(Debug, Clone)]
pub struct PrTimelineChangelog {
    pub window: DateWindow,
    pub repository: String,
    pub releases: Vec<PrReleaseSection>,
    pub markdown: String,
}

/// Changelog generator over a forge and a language model.
pub struct Generator<F: Forge, M: LanguageModel> {
    forge: F,
    client: ChangelogClient<M>,
    options: RenderOptions,
    verbosity: Verbosity,
}

impl<F: Forge, M: LanguageModel> Generator<F, M> {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingRepository` if `settings` has no owner or name.
    pub fn new(
        forge: F,
        client: ChangelogClient<M>,
        settings: &Settings,
        verbosity: Verbosity,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            forge,
            client,
            options: RenderOptions::from_settings(settings)?,
            verbosity,
        })
    }

    pub fn forge(&self) -> &F {
        &self.forge
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.options.repo_owner, self.options.repo_name)
    }

    /// Check that the repository is reachable with the configured token.
    pub async fn validate_access(&self) -> Result<(), GenerateError> {
        output::progress("Validating GitHub access...", self.verbosity);
        self.forge
            .validate_access()
            .await
            .map_err(GenerateError::Access)
    }

    /// Generate a changelog for one commit range.
    ///
    /// # Errors
    ///
    /// `GenerateError::NoCommits` when the range is empty; fetch and model
    /// failures otherwise.
    pub async fn generate(&self, range: &CommitRange) -> Result<Changelog, GenerateError> {
        output::progress(
            format!("Fetching commits from {} to {}...", range.from(), range.to()),
            self.verbosity,
        );
        let commits = fetch_commit_range(&self.forge, range.from(), range.to()).await?;
        if commits.is_empty() {
            return Err(GenerateError::NoCommits {
                from: range.from().to_string(),
                to: range.to().to_string(),
            });
        }

        output::progress(format!("Found {} commits", commits.len()), self.verbosity);
        output::progress("Preparing commits for LLM analysis...", self.verbosity);
        let request = ChangelogRequest {
            repository: self.repository(),
            from: range.from().to_string(),
            to: range.to().to_string(),
            commits: summarize_commits(&commits),
        };

        output::progress(
            format!("Sending to {} for changelog generation...", self.client.model().name()),
            self.verbosity,
        );
        let result = self
            .client
            .generate_changelog(&request, Vocabulary::Standard)
            .await
            .map_err(|source| GenerateError::Model {
                target: range.to_string(),
                source,
            })?;

        output::progress("Formatting changelog as markdown...", self.verbosity);
        let markdown = render_changelog(&result, range.from(), range.to(), &self.options);

        Ok(Changelog {
            range: range.clone(),
            repository: self.repository(),
            result,
            markdown,
        })
    }

    /// Generate a changelog for every release in a date window.
    ///
    /// Segments without commits are rendered as empty and skip the model.
    pub async fn generate_timeline(
        &self,
        window: &DateWindow,
    ) -> Result<TimelineChangelog, GenerateError> {
        let segments = self.discover(window).await?;

        let total = segments.len();
        let mut releases = Vec::with_capacity(total);
        for (i, segment) in segments.into_iter().enumerate() {
            output::progress(
                format!(
                    "[{}/{}] Processing {} → {} ({} commits)...",
                    i + 1,
                    total,
                    segment.from.name,
                    segment.to.name,
                    segment.commit_count()
                ),
                self.verbosity,
            );

            let result = if segment.commits.is_empty() {
                debug!(release = %segment.to.name, "empty segment, skipping model");
                None
            } else {
                let request = ChangelogRequest {
                    repository: self.repository(),
                    from: segment.from.name.clone(),
                    to: segment.to.name.clone(),
                    commits: summarize_commits(&segment.commits),
                };
                let result = self
                    .client
                    .generate_changelog(&request, Vocabulary::Extended)
                    .await
                    .map_err(|source| GenerateError::Model {
                        target: segment.to.name.clone(),
                        source,
                    })?;
                Some(result)
            };

            releases.push(ReleaseSection { segment, result });
        }

        let markdown = render_timeline(window, &releases, &self.options);
        Ok(TimelineChangelog {
            window: *window,
            repository: self.repository(),
            releases,
            markdown,
        })
    }

    /// Generate pull-request summaries for every release in a date window.
    ///
    /// Segments whose commits map to no merged pull request are left out.
    pub async fn generate_pr_timeline(
        &self,
        window: &DateWindow,
    ) -> Result<PrTimelineChangelog, GenerateError> {
        let segments = self.discover(window).await?;

        let total = segments.len();
        let mut releases = Vec::new();
        for (i, segment) in segments.into_iter().enumerate() {
            let pull_requests = self.collect_pull_requests(&segment).await?;
            output::progress(
                format!(
                    "[{}/{}] Processing {} → {} ({} pull requests)...",
                    i + 1,
                    total,
                    segment.from.name,
                    segment.to.name,
                    pull_requests.len()
                ),
                self.verbosity,
            );
            if pull_requests.is_empty() {
                debug!(release = %segment.to.name, "no merged pull requests, skipping");
                continue;
            }

            let request = PrChangelogRequest {
                repository: self.repository(),
                from: segment.from.name.clone(),
                to: segment.to.name.clone(),
                pull_requests,
            };
            let summaries = self
                .client
                .generate_pr_summaries(&request)
                .await
                .map_err(|source| GenerateError::Model {
                    target: segment.to.name.clone(),
                    source,
                })?;

            releases.push(PrReleaseSection {
                segment,
                pull_requests: request.pull_requests,
                summaries,
            });
        }

        let markdown = render_pr_timeline(window, &releases, &self.options);
        Ok(PrTimelineChangelog {
            window: *window,
            repository: self.repository(),
            releases,
            markdown,
        })
    }

    async fn discover(&self, window: &DateWindow) -> Result<Vec<ReleaseSegment>, GenerateError> {
        output::progress(format!("Discovering releases from {}...", window), self.verbosity);
        let timeline = resolve_timeline(&self.forge, window).await?;
        output::progress(
            format!("Found {} releases in timeline", timeline.points.len()),
            self.verbosity,
        );
        if timeline.points.len() == 1 {
            output::warn(
                format!(
                    "only one release ({}) in {}; widen the window to compare releases",
                    timeline.points[0].name, window
                ),
                self.verbosity,
            );
        }
        info!(segments = timeline.segments.len(), "resolved timeline");
        Ok(timeline.segments)
    }

    /// Distinct merged pull requests behind a segment's commits, first seen first.
    async fn collect_pull_requests(
        &self,
        segment: &ReleaseSegment,
    ) -> Result<Vec<PullRequestInfo>, GenerateError> {
        let mut pull_requests: Vec<PullRequestInfo> = Vec::new();
        for commit in &segment.commits {
            let found = self
                .forge
                .pull_requests_for_commit(&commit.sha)
                .await
                .map_err(|source| GenerateError::PullRequests {
                    sha: commit.sha.clone(),
                    source,
                })?;
            for pr in found.into_iter().filter(|pr| pr.merged) {
                if !pull_requests.iter().any(|seen| seen.number == pr.number) {
                    pull_requests.push(pr);
                }
            }
        }
        Ok(pull_requests)
    }
}
