//! Bot configuration.
//!
//! Stored as JSON at `~/.tanu/config.json`. Every section has defaults, so an
//! empty object or a missing file is a valid configuration.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-user directory under the home directory.
const APP_DIR: &str = ".tanu";

/// Words that end the interactive session by default.
pub const DEFAULT_EXIT_WORDS: [&str; 3] = ["exit", "quit", "stop"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Skill loading.
    #[serde(default)]
    pub skills: SkillsConfig,
    /// Interactive input.
    #[serde(default)]
    pub input: InputConfig,
    /// Console echo of skill results.
    #[serde(default)]
    pub echo: EchoConfig,
}

/// Skill loading configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Plugin directory. Defaults to `~/.tanu/skills`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl SkillsConfig {
    /// The effective plugin directory.
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(skills_dir)
    }
}

/// Interactive input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Prompt printed before each line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Words that end the session (compared trimmed and case-insensitively).
    #[serde(default = "default_exit_words")]
    pub exit_words: Vec<String>,
}

fn default_prompt() -> String {
    "You (type): ".to_string()
}

fn default_exit_words() -> Vec<String> {
    DEFAULT_EXIT_WORDS.iter().map(ToString::to_string).collect()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            exit_words: default_exit_words(),
        }
    }
}

/// Console echo configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoConfig {
    /// Print values returned by skills.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Severity of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Works, but probably not what was intended.
    Warning,
    /// Cannot work as configured.
    Error,
}

/// A problem found by [`BotConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Severity.
    pub level: IssueLevel,
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            IssueLevel::Warning => "warning",
            IssueLevel::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.field, self.message)
    }
}

impl BotConfig {
    /// Check the configuration for problems.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let dir = self.skills.resolved_dir();
        if !dir.is_dir() {
            issues.push(ConfigIssue {
                level: IssueLevel::Warning,
                field: "skills.dir",
                message: format!(
                    "{} does not exist, no skills will load (run `tanu init`)",
                    dir.display()
                ),
            });
        }

        if self.input.exit_words.is_empty() {
            issues.push(ConfigIssue {
                level: IssueLevel::Warning,
                field: "input.exit_words",
                message: "no exit words, the session can only end with Ctrl+C".to_string(),
            });
        }
        if self.input.exit_words.iter().any(|w| w.trim().is_empty()) {
            issues.push(ConfigIssue {
                level: IssueLevel::Error,
                field: "input.exit_words",
                message: "exit words must not be blank".to_string(),
            });
        }

        issues
    }

    /// Whether validation found any error-level issue.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.level == IssueLevel::Error)
    }
}

/// The user's home directory, falling back to the current directory.
#[must_use]
pub fn home_dir() -> PathBuf {
    dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// The per-user configuration directory (`~/.tanu`).
#[must_use]
pub fn config_dir() -> PathBuf {
    home_dir().join(APP_DIR)
}

/// Default configuration file path.
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Default plugin directory.
#[must_use]
pub fn skills_dir() -> PathBuf {
    config_dir().join("skills")
}

/// Load the configuration from `path`. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_config_from(path: &Path) -> ConfigResult<BotConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(BotConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Save the configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_config_to(config: &BotConfig, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Write a default configuration to `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the file exists and `force` is not
/// set, or an IO error if it cannot be written.
pub async fn init_config(path: &Path, force: bool) -> ConfigResult<BotConfig> {
    if path.exists() && !force {
        return Err(ConfigError::invalid(format!(
            "{} already exists",
            path.display()
        )));
    }
    let config = BotConfig::default();
    save_config_to(&config, path).await?;
    Ok(config)
}
