use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .asset-watch.toml.
///
/// All fields are optional — the tool works with zero config inside a
/// GitHub Actions run, reading the token and event path from the
/// environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to the GITHUB_TOKEN env var.
    pub token: Option<String>,

    /// API base URL, for GitHub Enterprise installs.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// "auto", "false", or an arbitrary command string.
    #[serde(default = "default_build_command")]
    pub command: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig { command: default_build_command() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Glob patterns handed verbatim to the size reporter.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Include files whose size barely moved in the comment.
    #[serde(default)]
    pub show_unchanged: bool,

    /// The external size-measurement command.
    #[serde(default = "default_reporter_command")]
    pub reporter_command: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            patterns: default_patterns(),
            show_unchanged: false,
            reporter_command: default_reporter_command(),
        }
    }
}

fn default_build_command() -> String {
    "auto".to_string()
}

fn default_patterns() -> Vec<String> {
    vec!["dist/**/*.js".to_string(), "dist/**/*.css".to_string()]
}

fn default_reporter_command() -> String {
    "npx asset-size-reporter".to_string()
}

impl Config {
    /// Load configuration from .asset-watch.toml in the current directory,
    /// falling back to defaults when the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".asset-watch.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence, falls
    /// back to the GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    /// Resolve the API base URL: config value, else the default public
    /// endpoint.
    pub fn api_url(&self) -> String {
        self.github
            .api_url
            .clone()
            .unwrap_or_else(|| crate::github::DEFAULT_API_URL.to_string())
    }
}
