//! Project configuration file support for songcritic.
//!
//! Loads configuration from `songcritic.toml` in the working directory,
//! falling back to the user's config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project-level configuration loaded from `songcritic.toml`
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Model tier or full model identifier
    pub model: Option<String>,
    /// Override for the Gemini REST base URL
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Reject responses that break the scoring rules instead of warning
    pub strict_consistency: Option<bool>,
    /// Console log format (pretty, json, compact)
    pub log_format: Option<String>,
    /// Directory for the rendered HTML views
    pub output_dir: Option<PathBuf>,
    /// JSONL file receiving submission events
    pub log_file: Option<PathBuf>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "songcritic.toml";

/// Environment variable read for the API key when none is configured
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Project file first, then `<config dir>/songcritic/songcritic.toml`, then defaults
    pub fn discover(working_dir: &Path) -> Result<Self> {
        if let Some(config) = Self::load(working_dir)? {
            return Ok(config);
        }

        match dirs::config_dir().map(|dir| dir.join("songcritic")) {
            Some(user_dir) => Ok(Self::load(&user_dir)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn strict(&self) -> bool {
        self.strict_consistency.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
model = "pro"
base_url = "http://localhost:8080"
api_key_env = "SONGCRITIC_KEY"
strict_consistency = true
log_format = "json"
output_dir = "critiques"
log_file = "logs/events.jsonl"
"#,
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.model.as_deref(), Some("pro"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.api_key_env(), "SONGCRITIC_KEY");
        assert!(config.strict());
        assert_eq!(config.output_dir, Some(PathBuf::from("critiques")));
        assert_eq!(config.log_file, Some(PathBuf::from("logs/events.jsonl")));
    }

    #[test]
    fn test_defaults_when_keys_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.api_key_env(), DEFAULT_API_KEY_ENV);
        assert!(!config.strict());
    }

    #[test]
    fn test_unknown_key_is_hard_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "temperature = 0.7\n").unwrap();

        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_project_file_wins_over_user_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "model = \"flash\"\n").unwrap();

        let config = ProjectConfig::discover(dir.path()).unwrap();
        assert_eq!(config.model.as_deref(), Some("flash"));
    }
}
