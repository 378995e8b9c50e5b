//! cli
//!
//! Command-line interface layer for relnotes.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve settings and validate inputs before any network call
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for generation. Network commands run on a tokio runtime
//! created for the command.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::ui::output::Verbosity;

/// Per-invocation context shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory config files are searched from and saved to
    pub cwd: PathBuf,
    /// Output verbosity from the global flags
    pub verbosity: Verbosity,
    /// Whether stdin is a terminal
    pub interactive: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        cwd: std::env::current_dir()
            .map_err(|e| anyhow!("cannot determine current directory: {}", e))?,
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        interactive: std::io::stdin().is_terminal(),
    };

    commands::dispatch(cli.command, &ctx)
}
