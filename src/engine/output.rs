//! engine::output
//!
//! Where a generated document goes.
//!
//! An output path of `-` (or an empty path) means stdout; anything else is
//! a file, overwritten if it exists. Status messages never go to stdout, so
//! `-o -` can be piped straight into another tool.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use super::generate::GenerateError;
use crate::core::types::DateWindow;

/// Resolved output destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Interpret a configured output path.
    pub fn from_path(path: &str) -> Self {
        match path.trim() {
            "" | "-" => OutputTarget::Stdout,
            other => OutputTarget::File(PathBuf::from(other)),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "stdout"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write `markdown` to `target`.
///
/// # Errors
///
/// `GenerateError::Write` if the file (or stdout) cannot be written.
pub fn write_output(markdown: &str, target: &OutputTarget) -> Result<(), GenerateError> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(markdown.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| GenerateError::Write {
                    path: PathBuf::from("-"),
                    source,
                })
        }
        OutputTarget::File(path) => write_file(path, markdown),
    }
}

fn write_file(path: &Path, markdown: &str) -> Result<(), GenerateError> {
    std::fs::write(path, markdown).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Default file name for a timeline document.
///
/// `{repo}-{startDay}-{endDay}-{month}-{year}-changelog.md`, with month and
/// year taken from the start of the window.
///
/// # Example
///
/// ```
/// use relnotes::core::types::DateWindow;
/// use relnotes::engine::output::timeline_output_name;
///
/// let window = DateWindow::parse("2026-02-05", "2026-02-09").unwrap();
/// assert_eq!(timeline_output_name("akto", &window), "akto-5-9-feb-2026-changelog.md");
/// ```
pub fn timeline_output_name(repo: &str, window: &DateWindow) -> String {
    let start = window.start();
    let end = window.end();
    format!(
        "{}-{}-{}-{}-{}-changelog.md",
        repo,
        start.day(),
        end.day(),
        start.format("%b").to_string().to_lowercase(),
        start.year()
    )
}
