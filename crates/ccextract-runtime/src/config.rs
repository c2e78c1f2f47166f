use ccextract_render::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const CONFIG_ENV: &str = "CCEXTRACT_CONFIG";
const CONFIG_FILE: &str = "config.toml";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. CCEXTRACT_CONFIG environment variable (with tilde expansion)
/// 3. Platform config directory (`~/.config/ccextract/config.toml` on Linux)
/// 4. ~/.ccextract/config.toml
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV)
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("ccextract").join(CONFIG_FILE));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".ccextract").join(CONFIG_FILE));
    }

    Err(Error::Config(
        "Could not determine config path: no home or config directory found".to_string(),
    ))
}

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// `~/.claude/projects`
pub fn default_claude_dir() -> PathBuf {
    expand_tilde("~/.claude/projects")
}

/// Persistent defaults. Every field is optional in the file; command-line
/// flags only ever switch options on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where Claude Code keeps its project transcripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    pub format: OutputFormat,
    pub detailed: bool,
    pub include_thinking: bool,
    pub by_day: bool,
    pub by_project: bool,
    pub overwrite: bool,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configured transcript root, or the default
    pub fn claude_dir(&self) -> PathBuf {
        self.claude_dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(default_claude_dir)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Markdown);
        assert!(!config.detailed);
        assert!(config.output_dir().is_none());
        assert!(config.claude_dir().ends_with(".claude/projects"));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            claude_dir: Some("/data/claude".into()),
            format: OutputFormat::Html,
            by_day: true,
            ..Default::default()
        };
        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.claude_dir(), PathBuf::from("/data/claude"));
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "format = \"json\"\noverwrite = true\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.overwrite);
        assert!(!config.by_project);
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "format = \"pdf\"")?;

        assert!(matches!(Config::load_from(&config_path), Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("missing.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_resolve_explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/etc/ccextract.toml"))?;
        assert_eq!(path, PathBuf::from("/etc/ccextract.toml"));
        Ok(())
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/~/x"), PathBuf::from("rel/~/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), home.join("logs"));
        }
    }
}
