//! cli::commands::generate
//!
//! Generate a changelog from GitHub history.
//!
//! # Algorithm
//!
//! 1. Select the mode from the arguments (range or date window)
//! 2. Load config and resolve settings (flags > env > file > defaults)
//! 3. Optionally ask for the repository on the terminal
//! 4. Validate credentials and repository before any network call
//! 5. Validate repository access, then generate
//! 6. Write the document to a file or stdout
//!
//! Any failure is fatal and leaves no output file behind.
//!
//! # Example
//!
//! ```bash
//! relnotes generate v1.0.0..v1.1.0 --owner octocat --repo hello
//! relnotes generate --from-date 2026-02-05 --to-date 2026-02-09 -o -
//! ```

use anyhow::Result;
use tracing::debug;

use crate::cli::args::GenerateArgs;
use crate::cli::Context;
use crate::core::config::{save_local_repo, ConfigError, LoadedConfig, Settings};
use crate::core::types::{CommitRange, DateWindow};
use crate::engine::{timeline_output_name, write_output, Generator, OutputTarget};
use crate::forge::github::GitHubForge;
use crate::llm::openai::OpenAiModel;
use crate::llm::ChangelogClient;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts;

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// One changelog for a commit range
    Range(CommitRange),
    /// One section per release in a date window
    Timeline {
        window: DateWindow,
        pr_summaries: bool,
    },
}

/// Pick the mode from the positional range and the date flags.
///
/// # Errors
///
/// `ConfigError::ConflictingModes` when both or neither are given, or only
/// one date is given; `ConfigError::Input` for a malformed range or date.
pub fn select_mode(
    range: Option<&str>,
    from_date: Option<&str>,
    to_date: Option<&str>,
    pr_summaries: bool,
) -> Result<Mode, ConfigError> {
    let has_dates = from_date.is_some() || to_date.is_some();
    match (range, has_dates) {
        (Some(_), true) => Err(ConfigError::ConflictingModes(
            "cannot use both date flags (--from-date/--to-date) and ref argument ([from]..[to])"
                .to_string(),
        )),
        (None, false) => Err(ConfigError::ConflictingModes(
            "must specify either date range (--from-date/--to-date) or ref range ([from]..[to])"
                .to_string(),
        )),
        (Some(expr), false) => {
            if pr_summaries {
                return Err(ConfigError::ConflictingModes(
                    "--pr-summaries requires a date range (--from-date/--to-date)".to_string(),
                ));
            }
            Ok(Mode::Range(CommitRange::parse(expr)?))
        }
        (None, true) => match (from_date, to_date) {
            (Some(from), Some(to)) => Ok(Mode::Timeline {
                window: DateWindow::parse(from, to)?,
                pr_summaries,
            }),
            _ => Err(ConfigError::ConflictingModes(
                "both --from-date and --to-date are required for timeline mode".to_string(),
            )),
        },
    }
}

/// Run `relnotes generate`.
pub fn generate(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let mode = select_mode(
        args.range.as_deref(),
        args.from_date.as_deref(),
        args.to_date.as_deref(),
        args.pr_summaries,
    )?;

    let loaded = LoadedConfig::load(&ctx.cwd)?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), "loaded config");
    }

    let verbose = ctx.verbosity.is_verbose();
    let mut settings = Settings::resolve(
        &loaded.file,
        |key| std::env::var(key).ok(),
        &args.overrides(verbose),
    )?;
    let verbosity = match ctx.verbosity {
        Verbosity::Normal if settings.verbose => Verbosity::Verbose,
        other => other,
    };

    if args.interactive {
        settings = ask_repository(ctx, &settings, verbosity)?;
    }

    let token = settings.require_github_token()?.to_string();
    let api_key = settings.require_openai_api_key()?.to_string();
    let (owner, repo) = settings.require_repository()?;
    debug!(settings = ?settings, "resolved settings");

    let forge = GitHubForge::with_api_base(token, owner, repo, settings.github_api_base.as_str());
    let model = OpenAiModel::with_base_url(
        api_key,
        settings.model.as_str(),
        settings.max_tokens,
        settings.temperature,
        settings.openai_base_url.as_str(),
    );
    let generator = Generator::new(forge, ChangelogClient::new(model), &settings, verbosity)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(&generator, &settings, mode, verbosity))
}

async fn run(
    generator: &Generator<GitHubForge, OpenAiModel>,
    settings: &Settings,
    mode: Mode,
    verbosity: Verbosity,
) -> Result<()> {
    generator.validate_access().await?;

    let (markdown, target, suffix) = match mode {
        Mode::Range(range) => {
            let changelog = generator.generate(&range).await?;
            (
                changelog.markdown,
                OutputTarget::from_path(&settings.output_path),
                String::new(),
            )
        }
        Mode::Timeline {
            window,
            pr_summaries,
        } => {
            let target = timeline_target(settings, &window);
            let (markdown, releases) = if pr_summaries {
                let changelog = generator.generate_pr_timeline(&window).await?;
                (changelog.markdown, changelog.releases.len())
            } else {
                let changelog = generator.generate_timeline(&window).await?;
                (changelog.markdown, changelog.releases.len())
            };
            (markdown, target, format!(" ({} releases)", releases))
        }
    };

    write_output(&markdown, &target)?;
    if let OutputTarget::File(path) = &target {
        output::success(
            format!("Changelog written to {}{}", path.display(), suffix),
            verbosity,
        );
    }
    Ok(())
}

/// Output target for timeline mode; the default path becomes a dated name.
fn timeline_target(settings: &Settings, window: &DateWindow) -> OutputTarget {
    match settings.repo_name.as_deref() {
        Some(repo) if settings.uses_default_output() => {
            OutputTarget::File(timeline_output_name(repo, window).into())
        }
        _ => OutputTarget::from_path(&settings.output_path),
    }
}

/// Ask for owner and repository, offering to remember them.
fn ask_repository(ctx: &Context, settings: &Settings, verbosity: Verbosity) -> Result<Settings> {
    let owner = prompts::input(
        "Repository owner (e.g., facebook, vercel, golang):",
        ctx.interactive,
    )?;
    let repo = prompts::input("Repository name (e.g., react, next.js, go):", ctx.interactive)?;

    let save = prompts::confirm(
        &format!(
            "Save {}/{} to {} for future use?",
            owner,
            repo,
            crate::core::config::LOCAL_CONFIG_FILE
        ),
        true,
        ctx.interactive,
    )?;
    if save {
        match save_local_repo(&ctx.cwd, &owner, &repo) {
            Ok(path) => output::success(format!("Saved to {}", path.display()), verbosity),
            Err(e) => output::warn(format!("could not save repository: {}", e), verbosity),
        }
    }

    Ok(settings.with_repository(&owner, &repo))
}
