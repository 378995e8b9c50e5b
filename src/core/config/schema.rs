//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Locations
//!
//! Searched in order, first found wins:
//! 1. `$RELNOTES_CONFIG` if set
//! 2. `./.relnotes.local.toml` (per-checkout, written by `--interactive`)
//! 3. `./.relnotes.toml`
//! 4. `~/.relnotes.toml`
//!
//! # Validation
//!
//! Numeric values are range-checked after parsing. Secrets are never read
//! from the file; they come from `GITHUB_TOKEN` and `OPENAI_API_KEY` only.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Largest accepted `min_score`.
pub const MAX_SCORE: f64 = 10.0;

/// Largest accepted `temperature`.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Configuration file contents.
///
/// Every key is optional; missing keys fall through to the environment
/// and then to built-in defaults.
///
/// # Example
///
/// ```toml
/// repo_owner = "octocat"
/// repo_name = "hello-world"
/// model = "gpt-4o"
/// max_tokens = 4000
/// temperature = 0.3
/// output_path = "CHANGELOG.md"
/// include_authors = true
/// show_scores = false
/// min_score = 0.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Repository owner or organization
    pub repo_owner: Option<String>,

    /// Repository name
    pub repo_name: Option<String>,

    /// GitHub REST API base URL
    pub github_api_base: Option<String>,

    /// OpenAI-compatible API base URL
    pub openai_base_url: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Response token limit
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// Output file, or `-` for stdout
    pub output_path: Option<String>,

    /// Show `by @author` on entries
    pub include_authors: Option<bool>,

    /// Show commit dates in timeline commit lists
    pub include_dates: Option<bool>,

    /// Show importance badges
    pub show_scores: Option<bool>,

    /// Drop entries scored below this
    pub min_score: Option<f64>,

    /// Verbose progress output
    pub verbose: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(score) = self.min_score {
            validate_min_score(score)?;
        }
        if let Some(temperature) = self.temperature {
            validate_temperature(temperature)?;
        }
        if let Some(max_tokens) = self.max_tokens {
            validate_max_tokens(max_tokens)?;
        }
        for (key, value) in [
            ("repo_owner", &self.repo_owner),
            ("repo_name", &self.repo_name),
            ("model", &self.model),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_min_score(score: f64) -> Result<(), ConfigError> {
    if !(0.0..=MAX_SCORE).contains(&score) {
        return Err(ConfigError::InvalidValue(format!(
            "min_score must be between 0 and {}, got {}",
            MAX_SCORE, score
        )));
    }
    Ok(())
}

pub(crate) fn validate_temperature(temperature: f64) -> Result<(), ConfigError> {
    if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(ConfigError::InvalidValue(format!(
            "temperature must be between 0 and {}, got {}",
            MAX_TEMPERATURE, temperature
        )));
    }
    Ok(())
}

pub(crate) fn validate_max_tokens(max_tokens: u32) -> Result<(), ConfigError> {
    if max_tokens == 0 {
        return Err(ConfigError::InvalidValue(
            "max_tokens must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FileConfig::default();
        assert!(config.repo_owner.is_none());
        assert!(config.model.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn roundtrip() {
        let config = FileConfig {
            repo_owner: Some("octocat".to_string()),
            repo_name: Some("hello-world".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            max_tokens: Some(2000),
            temperature: Some(0.5),
            show_scores: Some(true),
            min_score: Some(4.0),
            ..Default::default()
        };

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: FileConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            repo_owner = "octocat"
            github_token = "ghp_secret"
        "#;

        let result: Result<FileConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn min_score_out_of_range() {
        let config = FileConfig {
            min_score: Some(11.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn temperature_out_of_range() {
        let config = FileConfig {
            temperature: Some(-0.1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let config = FileConfig {
            max_tokens: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_owner_rejected() {
        let config = FileConfig {
            repo_owner: Some("  ".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repo_owner cannot be empty"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let config = FileConfig {
            min_score: Some(10.0),
            temperature: Some(2.0),
            max_tokens: Some(1),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
