//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--verbose` / `-v`: Progress output on stderr
//! - `--quiet` / `-q`: Minimal output
//! - `--debug`: Enable debug logging

use clap::{Args, Parser, Subcommand};

use crate::core::config::Overrides;

/// Relnotes - changelogs from GitHub history, written by a language model
#[derive(Parser, Debug)]
#[command(name = "relnotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show progress while generating
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output; wins over --verbose
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a changelog
    #[command(
        name = "generate",
        long_about = "Generate a changelog for a commit range or a date window.\n\n\
            With a FROM..TO range, every commit between the two refs is sent to the \
            model in one request and rendered as a single categorized changelog.\n\n\
            With --from-date and --to-date, every tag and release in the window is \
            discovered and one section is written per release, newest first. Add \
            --pr-summaries to describe the merged pull requests of each release instead.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Changelog between two tags
    relnotes generate v1.0.0..v1.1.0

    # Print to stdout instead of CHANGELOG.md
    relnotes generate v1.0.0..v1.1.0 -o -

    # Every release in February, with importance scores
    relnotes generate --from-date 2026-02-01 --to-date 2026-02-28 --show-scores

    # Merged pull requests per release
    relnotes generate --from-date 2026-02-01 --to-date 2026-02-28 --pr-summaries

ENVIRONMENT:
    GITHUB_TOKEN      GitHub token with read access to the repository (required)
    OPENAI_API_KEY    API key for the chat completions endpoint (required)"
    )]
    Generate(GenerateArgs),

    /// Show the resolved configuration
    #[command(
        name = "config",
        long_about = "Show the configuration a generate run would use.\n\n\
            Values are merged from flags, RELNOTES_* environment variables, the first \
            config file found and built-in defaults. Credentials are redacted.",
        after_help = "\
CONFIG FILES (first found wins):
    $RELNOTES_CONFIG
    ./.relnotes.local.toml
    ./.relnotes.toml
    ~/.relnotes.toml"
    )]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for relnotes.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    relnotes completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    relnotes completion zsh >> ~/.zshrc

    # Fish
    relnotes completion fish > ~/.config/fish/completions/relnotes.fish

    # PowerShell
    relnotes completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `relnotes generate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Commit range as FROM..TO (tags, branches or hashes)
    #[arg(value_name = "FROM..TO")]
    pub range: Option<String>,

    /// Repository owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// Output file; `-` prints to stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum tokens in the model's answer
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0-2)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Credit commit authors
    #[arg(long, overrides_with = "no_include_authors")]
    pub include_authors: bool,

    /// Do not credit commit authors
    #[arg(long)]
    pub no_include_authors: bool,

    /// Show commit dates in timeline sections
    #[arg(long)]
    pub include_dates: bool,

    /// Show importance scores next to entries
    #[arg(long)]
    pub show_scores: bool,

    /// Hide entries scored below this (0-10)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from_date: Option<String>,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to_date: Option<String>,

    /// Summarize merged pull requests per release (timeline mode)
    #[arg(long)]
    pub pr_summaries: bool,

    /// Ask for the repository on the terminal
    #[arg(short, long)]
    pub interactive: bool,
}

impl GenerateArgs {
    /// Settings overrides for the flags that were given.
    pub fn overrides(&self, verbose: bool) -> Overrides {
        let include_authors = if self.no_include_authors {
            Some(false)
        } else if self.include_authors {
            Some(true)
        } else {
            None
        };
        Overrides {
            repo_owner: self.owner.clone(),
            repo_name: self.repo.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            output_path: self.output.clone(),
            include_authors,
            include_dates: self.include_dates.then_some(true),
            show_scores: self.show_scores.then_some(true),
            min_score: self.min_score,
            verbose: verbose.then_some(true),
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
