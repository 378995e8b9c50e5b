//! ui::output
//!
//! Console output for people, as opposed to the changelog itself.
//!
//! # Design
//!
//! Output respects the quiet and verbose flags. Progress and warnings go to
//! stderr so that `--output -` leaves stdout holding only markdown.
//! Diagnostics for developers go through `tracing`, not this module.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - results and warnings
    #[default]
    Normal,
    /// Verbose mode - step-by-step progress
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }
}

/// Print a message to stdout (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a progress line to stderr (verbose mode only).
pub fn progress(message: impl Display, verbosity: Verbosity) {
    if verbosity.is_verbose() {
        eprintln!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
///
/// Verbose mode marks it with a check.
pub fn success(message: impl Display, verbosity: Verbosity) {
    match verbosity {
        Verbosity::Quiet => {}
        Verbosity::Normal => eprintln!("{}", message),
        Verbosity::Verbose => eprintln!("✓ {}", message),
    }
}

/// Format `key: value` pairs with aligned values.
pub fn format_pairs<K: Display, V: Display>(pairs: &[(K, V)]) -> String {
    let width = pairs
        .iter()
        .map(|(key, _)| key.to_string().chars().count())
        .max()
        .unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| format!("{:<width$}  {}", format!("{}:", key), value, width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
