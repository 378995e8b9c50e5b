//! core::config
//!
//! Configuration loading and resolution.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file (first found, see [`schema`])
//! 3. Environment (`RELNOTES_<KEY>`, e.g. `RELNOTES_MODEL`)
//! 4. CLI flags ([`Overrides`])
//!
//! Credentials are environment-only: `GITHUB_TOKEN` and `OPENAI_API_KEY`.
//!
//! # Design
//!
//! Resolution happens once, producing an immutable [`Settings`] that is
//! passed by reference into every component. The environment is supplied
//! as a lookup function so resolution is testable without touching the
//! process environment.
//!
//! # Example
//!
//! ```no_run
//! use relnotes::core::config::{LoadedConfig, Overrides, Settings};
//! use std::path::Path;
//!
//! let loaded = LoadedConfig::load(Path::new(".")).unwrap();
//! let settings = Settings::resolve(
//!     &loaded.file,
//!     |key| std::env::var(key).ok(),
//!     &Overrides::default(),
//! )
//! .unwrap();
//! println!("model: {}", settings.model);
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::core::types::TypeError;

/// Per-checkout config file, written by `--interactive`.
pub const LOCAL_CONFIG_FILE: &str = ".relnotes.local.toml";

/// Project config file.
pub const PROJECT_CONFIG_FILE: &str = ".relnotes.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RELNOTES_CONFIG";

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_OUTPUT_PATH: &str = "CHANGELOG.md";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors from configuration and input validation.
///
/// All of these are raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("{var} environment variable is required")]
    MissingCredential { var: &'static str },

    #[error("repository owner and name are required (set repo_owner/repo_name in config, pass --owner/--repo, or use --interactive)")]
    MissingRepository,

    #[error(transparent)]
    Input(#[from] TypeError),

    #[error("{0}")]
    ConflictingModes(String),
}

/// A config file and where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Parsed file contents, or defaults when no file was found.
    pub file: FileConfig,
    /// Path the file was loaded from.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Load the first config file found relative to `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. Missing config files are not an error.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_with(cwd, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Like [`LoadedConfig::load`] with an explicit environment and home directory.
    pub fn load_with(
        cwd: &Path,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut candidates = Vec::new();
        if let Some(explicit) = env(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            candidates.push(PathBuf::from(explicit));
        }
        candidates.push(cwd.join(LOCAL_CONFIG_FILE));
        candidates.push(cwd.join(PROJECT_CONFIG_FILE));
        if let Some(home) = home {
            candidates.push(home.join(PROJECT_CONFIG_FILE));
        }

        for path in candidates {
            if path.exists() {
                let file = read_config(&path)?;
                file.validate()?;
                return Ok(Self {
                    file,
                    path: Some(path),
                });
            }
        }

        Ok(Self::default())
    }
}

/// Read and parse a config file.
fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Save owner and repo to `dir/.relnotes.local.toml`.
///
/// Other keys already in the file are preserved. Uses atomic write
/// (write to temp file, then rename).
pub fn save_local_repo(dir: &Path, owner: &str, repo: &str) -> Result<PathBuf, ConfigError> {
    let path = dir.join(LOCAL_CONFIG_FILE);
    let mut config = if path.exists() {
        read_config(&path)?
    } else {
        FileConfig::default()
    };
    config.repo_owner = Some(owner.to_string());
    config.repo_name = Some(repo.to_string());
    write_config_atomic(&path, &config)?;
    Ok(path)
}

/// Write a config file atomically.
fn write_config_atomic<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(contents.as_bytes())
        .map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

    file.sync_all().map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub output_path: Option<String>,
    pub include_authors: Option<bool>,
    pub include_dates: Option<bool>,
    pub show_scores: Option<bool>,
    pub min_score: Option<f64>,
    pub verbose: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub github_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub github_api_base: String,
    pub openai_base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub output_path: String,
    pub include_authors: bool,
    pub include_dates: bool,
    pub show_scores: bool,
    pub min_score: f64,
    pub verbose: bool,
}

impl Settings {
    /// Merge defaults, file, environment and overrides into settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unparseable environment
    /// values or out-of-range results.
    pub fn resolve(
        file: &FileConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let text = |over: &Option<String>, key: &str, from_file: &Option<String>| {
            over.clone()
                .or_else(|| env(key))
                .or_else(|| from_file.clone())
        };

        let settings = Settings {
            repo_owner: text(&overrides.repo_owner, "RELNOTES_REPO_OWNER", &file.repo_owner),
            repo_name: text(&overrides.repo_name, "RELNOTES_REPO_NAME", &file.repo_name),
            github_token: env(GITHUB_TOKEN_ENV),
            openai_api_key: env(OPENAI_API_KEY_ENV),
            github_api_base: text(&None, "RELNOTES_GITHUB_API_BASE", &file.github_api_base)
                .unwrap_or_else(|| crate::forge::github::DEFAULT_API_BASE.to_string()),
            openai_base_url: text(&None, "RELNOTES_OPENAI_BASE_URL", &file.openai_base_url)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: text(&overrides.model, "RELNOTES_MODEL", &file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: pick(overrides.max_tokens, &env, "RELNOTES_MAX_TOKENS", file.max_tokens)?
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: pick(overrides.temperature, &env, "RELNOTES_TEMPERATURE", file.temperature)?
                .unwrap_or(DEFAULT_TEMPERATURE),
            output_path: text(&overrides.output_path, "RELNOTES_OUTPUT_PATH", &file.output_path)
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            include_authors: pick_flag(
                overrides.include_authors,
                &env,
                "RELNOTES_INCLUDE_AUTHORS",
                file.include_authors,
            )?
            .unwrap_or(true),
            include_dates: pick_flag(
                overrides.include_dates,
                &env,
                "RELNOTES_INCLUDE_DATES",
                file.include_dates,
            )?
            .unwrap_or(false),
            show_scores: pick_flag(
                overrides.show_scores,
                &env,
                "RELNOTES_SHOW_SCORES",
                file.show_scores,
            )?
            .unwrap_or(false),
            min_score: pick(overrides.min_score, &env, "RELNOTES_MIN_SCORE", file.min_score)?
                .unwrap_or(0.0),
            verbose: pick_flag(overrides.verbose, &env, "RELNOTES_VERBOSE", file.verbose)?
                .unwrap_or(false),
        };

        schema::validate_min_score(settings.min_score)?;
        schema::validate_temperature(settings.temperature)?;
        schema::validate_max_tokens(settings.max_tokens)?;
        Ok(settings)
    }

    /// The GitHub token, or an error naming the missing variable.
    pub fn require_github_token(&self) -> Result<&str, ConfigError> {
        self.github_token
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                var: GITHUB_TOKEN_ENV,
            })
    }

    /// The OpenAI API key, or an error naming the missing variable.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                var: OPENAI_API_KEY_ENV,
            })
    }

    /// Owner and repository name, both required.
    pub fn require_repository(&self) -> Result<(&str, &str), ConfigError> {
        match (self.repo_owner.as_deref(), self.repo_name.as_deref()) {
            (Some(owner), Some(repo)) => Ok((owner, repo)),
            _ => Err(ConfigError::MissingRepository),
        }
    }

    /// Copy of these settings with a different repository.
    pub fn with_repository(&self, owner: &str, repo: &str) -> Self {
        Self {
            repo_owner: Some(owner.to_string()),
            repo_name: Some(repo.to_string()),
            ..self.clone()
        }
    }

    /// Whether the output path was left at its default.
    pub fn uses_default_output(&self) -> bool {
        self.output_path == DEFAULT_OUTPUT_PATH
    }

    /// Key/value pairs for display, with credentials redacted.
    pub fn redacted_entries(&self) -> Vec<(&'static str, String)> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "(not set)".to_string());
        vec![
            ("repo_owner", opt(&self.repo_owner)),
            ("repo_name", opt(&self.repo_name)),
            (GITHUB_TOKEN_ENV, redact(&self.github_token)),
            (OPENAI_API_KEY_ENV, redact(&self.openai_api_key)),
            ("github_api_base", self.github_api_base.clone()),
            ("openai_base_url", self.openai_base_url.clone()),
            ("model", self.model.clone()),
            ("max_tokens", self.max_tokens.to_string()),
            ("temperature", self.temperature.to_string()),
            ("output_path", self.output_path.clone()),
            ("include_authors", self.include_authors.to_string()),
            ("include_dates", self.include_dates.to_string()),
            ("show_scores", self.show_scores.to_string()),
            ("min_score", self.min_score.to_string()),
            ("verbose", self.verbose.to_string()),
        ]
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("github_token", &redact(&self.github_token))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("github_api_base", &self.github_api_base)
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("output_path", &self.output_path)
            .field("include_authors", &self.include_authors)
            .field("include_dates", &self.include_dates)
            .field("show_scores", &self.show_scores)
            .field("min_score", &self.min_score)
            .field("verbose", &self.verbose)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> String {
    match secret {
        Some(_) => "[REDACTED]".to_string(),
        None => "(not set)".to_string(),
    }
}

/// Override, then environment, then file.
fn pick<T: FromStr>(
    over: Option<T>,
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    from_file: Option<T>,
) -> Result<Option<T>, ConfigError> {
    if over.is_some() {
        return Ok(over);
    }
    if let Some(raw) = env(key) {
        let value = raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(format!("{}: cannot parse '{}'", key, raw))
        })?;
        return Ok(Some(value));
    }
    Ok(from_file)
}

/// Like [`pick`] for booleans, also accepting `1/0` and `yes/no`.
fn pick_flag(
    over: Option<bool>,
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    from_file: Option<bool>,
) -> Result<Option<bool>, ConfigError> {
    if over.is_some() {
        return Ok(over);
    }
    if let Some(raw) = env(key) {
        let value = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidValue(format!(
                    "{}: expected true or false, got '{}'",
                    key, raw
                )))
            }
        };
        return Ok(Some(value));
    }
    Ok(from_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    mod loading {
        use super::*;

        #[test]
        fn no_files_gives_defaults() {
            let temp = TempDir::new().unwrap();
            let loaded = LoadedConfig::load_with(temp.path(), no_env, None).unwrap();
            assert!(loaded.path.is_none());
            assert_eq!(loaded.file, FileConfig::default());
        }

        #[test]
        fn local_file_wins_over_project_file() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(PROJECT_CONFIG_FILE), "repo_owner = \"project\"").unwrap();
            fs::write(temp.path().join(LOCAL_CONFIG_FILE), "repo_owner = \"local\"").unwrap();

            let loaded = LoadedConfig::load_with(temp.path(), no_env, None).unwrap();
            assert_eq!(loaded.file.repo_owner.as_deref(), Some("local"));
            assert_eq!(loaded.path, Some(temp.path().join(LOCAL_CONFIG_FILE)));
        }

        #[test]
        fn explicit_path_wins() {
            let temp = TempDir::new().unwrap();
            let explicit = temp.path().join("custom.toml");
            fs::write(&explicit, "model = \"gpt-4o-mini\"").unwrap();
            fs::write(temp.path().join(LOCAL_CONFIG_FILE), "model = \"other\"").unwrap();

            let env = env_of(&[(CONFIG_PATH_ENV, explicit.to_str().unwrap())]);
            let loaded = LoadedConfig::load_with(temp.path(), env, None).unwrap();
            assert_eq!(loaded.file.model.as_deref(), Some("gpt-4o-mini"));
        }

        #[test]
        fn home_file_is_last_resort() {
            let cwd = TempDir::new().unwrap();
            let home = TempDir::new().unwrap();
            fs::write(home.path().join(PROJECT_CONFIG_FILE), "show_scores = true").unwrap();

            let loaded =
                LoadedConfig::load_with(cwd.path(), no_env, Some(home.path().to_path_buf()))
                    .unwrap();
            assert_eq!(loaded.file.show_scores, Some(true));
        }

        #[test]
        fn unknown_fields_rejected() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(PROJECT_CONFIG_FILE), "unknown_field = true").unwrap();
            let err = LoadedConfig::load_with(temp.path(), no_env, None).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { .. }));
        }

        #[test]
        fn invalid_values_rejected() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(PROJECT_CONFIG_FILE), "min_score = 42.0").unwrap();
            let err = LoadedConfig::load_with(temp.path(), no_env, None).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(_)));
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn defaults() {
            let settings =
                Settings::resolve(&FileConfig::default(), no_env, &Overrides::default()).unwrap();
            assert_eq!(settings.model, "gpt-4o");
            assert_eq!(settings.max_tokens, 4000);
            assert!((settings.temperature - 0.3).abs() < f64::EPSILON);
            assert_eq!(settings.output_path, "CHANGELOG.md");
            assert!(settings.include_authors);
            assert!(!settings.include_dates);
            assert!(!settings.show_scores);
            assert_eq!(settings.min_score, 0.0);
            assert!(settings.uses_default_output());
            assert_eq!(settings.github_api_base, "https://api.github.com");
            assert_eq!(settings.openai_base_url, "https://api.openai.com/v1");
        }

        #[test]
        fn precedence_flag_over_env_over_file() {
            let file = FileConfig {
                model: Some("from-file".into()),
                max_tokens: Some(1000),
                repo_owner: Some("file-owner".into()),
                ..Default::default()
            };
            let env = env_of(&[
                ("RELNOTES_MODEL", "from-env"),
                ("RELNOTES_MAX_TOKENS", "2000"),
            ]);
            let overrides = Overrides {
                model: Some("from-flag".into()),
                ..Default::default()
            };

            let settings = Settings::resolve(&file, env, &overrides).unwrap();
            assert_eq!(settings.model, "from-flag");
            assert_eq!(settings.max_tokens, 2000);
            assert_eq!(settings.repo_owner.as_deref(), Some("file-owner"));
        }

        #[test]
        fn flag_can_disable_authors() {
            let overrides = Overrides {
                include_authors: Some(false),
                ..Default::default()
            };
            let env = env_of(&[("RELNOTES_INCLUDE_AUTHORS", "true")]);
            let settings = Settings::resolve(&FileConfig::default(), env, &overrides).unwrap();
            assert!(!settings.include_authors);
        }

        #[test]
        fn env_booleans() {
            let env = env_of(&[("RELNOTES_SHOW_SCORES", "yes"), ("RELNOTES_VERBOSE", "1")]);
            let settings =
                Settings::resolve(&FileConfig::default(), env, &Overrides::default()).unwrap();
            assert!(settings.show_scores);
            assert!(settings.verbose);
        }

        #[test]
        fn unparseable_env_is_an_error() {
            let env = env_of(&[("RELNOTES_MAX_TOKENS", "lots")]);
            let err = Settings::resolve(&FileConfig::default(), env, &Overrides::default())
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "invalid config value: RELNOTES_MAX_TOKENS: cannot parse 'lots'"
            );
        }

        #[test]
        fn out_of_range_flag_is_an_error() {
            let overrides = Overrides {
                min_score: Some(12.0),
                ..Default::default()
            };
            assert!(Settings::resolve(&FileConfig::default(), no_env, &overrides).is_err());
        }

        #[test]
        fn blank_env_is_unset() {
            let env = env_of(&[(GITHUB_TOKEN_ENV, "  "), ("RELNOTES_MODEL", "")]);
            let settings =
                Settings::resolve(&FileConfig::default(), env, &Overrides::default()).unwrap();
            assert!(settings.github_token.is_none());
            assert_eq!(settings.model, DEFAULT_MODEL);
        }

        #[test]
        fn credentials_come_from_env() {
            let env = env_of(&[(GITHUB_TOKEN_ENV, "ghp_x"), (OPENAI_API_KEY_ENV, "sk-y")]);
            let settings =
                Settings::resolve(&FileConfig::default(), env, &Overrides::default()).unwrap();
            assert_eq!(settings.require_github_token().unwrap(), "ghp_x");
            assert_eq!(settings.require_openai_api_key().unwrap(), "sk-y");
        }

        #[test]
        fn missing_credentials_name_the_variable() {
            let settings =
                Settings::resolve(&FileConfig::default(), no_env, &Overrides::default()).unwrap();
            assert_eq!(
                settings.require_github_token().unwrap_err().to_string(),
                "GITHUB_TOKEN environment variable is required"
            );
            assert_eq!(
                settings.require_openai_api_key().unwrap_err().to_string(),
                "OPENAI_API_KEY environment variable is required"
            );
        }

        #[test]
        fn repository_requires_both_parts() {
            let file = FileConfig {
                repo_owner: Some("octocat".into()),
                ..Default::default()
            };
            let settings = Settings::resolve(&file, no_env, &Overrides::default()).unwrap();
            assert!(matches!(
                settings.require_repository(),
                Err(ConfigError::MissingRepository)
            ));

            let settings = settings.with_repository("octocat", "hello");
            assert_eq!(settings.require_repository().unwrap(), ("octocat", "hello"));
        }

        #[test]
        fn debug_redacts_secrets() {
            let env = env_of(&[(GITHUB_TOKEN_ENV, "ghp_secret"), (OPENAI_API_KEY_ENV, "sk-secret")]);
            let settings =
                Settings::resolve(&FileConfig::default(), env, &Overrides::default()).unwrap();
            let debug = format!("{:?}", settings);
            assert!(!debug.contains("ghp_secret"));
            assert!(!debug.contains("sk-secret"));
            assert!(debug.contains("[REDACTED]"));

            let entries = settings.redacted_entries();
            assert!(entries.iter().all(|(_, v)| !v.contains("secret")));
        }
    }

    mod saving {
        use super::*;

        #[test]
        fn creates_local_file() {
            let temp = TempDir::new().unwrap();
            let path = save_local_repo(temp.path(), "octocat", "hello-world").unwrap();

            assert_eq!(path, temp.path().join(LOCAL_CONFIG_FILE));
            let loaded = LoadedConfig::load_with(temp.path(), no_env, None).unwrap();
            assert_eq!(loaded.file.repo_owner.as_deref(), Some("octocat"));
            assert_eq!(loaded.file.repo_name.as_deref(), Some("hello-world"));
            assert!(!temp.path().join(".relnotes.local.toml.tmp").exists());
        }

        #[test]
        fn preserves_other_keys() {
            let temp = TempDir::new().unwrap();
            fs::write(
                temp.path().join(LOCAL_CONFIG_FILE),
                "repo_owner = \"old\"\nmodel = \"gpt-4o-mini\"\n",
            )
            .unwrap();

            save_local_repo(temp.path(), "new", "repo").unwrap();

            let loaded = LoadedConfig::load_with(temp.path(), no_env, None).unwrap();
            assert_eq!(loaded.file.repo_owner.as_deref(), Some("new"));
            assert_eq!(loaded.file.model.as_deref(), Some("gpt-4o-mini"));
        }
    }
}
