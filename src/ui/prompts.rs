//! ui::prompts
//!
//! Interactive prompts on the terminal.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode
//! they fail with `PromptError::NotInteractive` rather than block.
//! The `*_with` variants take explicit reader and writer handles so the
//! line handling is testable without a terminal.

use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::IoError(e.to_string())
    }
}

/// Prompt for confirmation (yes/no) on the terminal.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    confirm_with(&mut io::stdin().lock(), &mut io::stderr(), message, default)
}

/// Prompt for required text input on the terminal.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    input_with(&mut io::stdin().lock(), &mut io::stderr(), message)
}

/// Ask until a non-empty answer is given. End of input cancels.
pub fn input_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> Result<String, PromptError> {
    loop {
        write!(writer, "{} ", message)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        writeln!(writer, "A value is required.")?;
    }
}

/// Ask a yes/no question. An empty answer takes `default`.
pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: bool,
) -> Result<bool, PromptError> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        write!(writer, "{} {} ", message, hint)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "Please answer y or n.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn input_skips_blank_answers() {
        let mut reader = Cursor::new("\n  \noctocat\n");
        let mut out = Vec::new();
        let answer = input_with(&mut reader, &mut out, "Owner:").unwrap();
        assert_eq!(answer, "octocat");
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("A value is required.").count(), 2);
    }

    #[test]
    fn input_eof_cancels() {
        let mut reader = Cursor::new("");
        let mut out = Vec::new();
        assert!(matches!(
            input_with(&mut reader, &mut out, "Owner:"),
            Err(PromptError::Cancelled)
        ));
    }

    #[test]
    fn confirm_default_and_answers() {
        let mut out = Vec::new();
        assert!(confirm_with(&mut Cursor::new("\n"), &mut out, "Save?", true).unwrap());
        assert!(!confirm_with(&mut Cursor::new("\n"), &mut out, "Save?", false).unwrap());
        assert!(confirm_with(&mut Cursor::new("YES\n"), &mut out, "Save?", false).unwrap());
        assert!(!confirm_with(&mut Cursor::new("maybe\nn\n"), &mut out, "Save?", true).unwrap());
    }

    #[test]
    fn non_interactive_fails_fast() {
        assert!(matches!(
            input("Owner:", false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            confirm("Save?", true, false),
            Err(PromptError::NotInteractive)
        ));
    }
}
