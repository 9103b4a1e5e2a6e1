//! Configuration file support for cubemx-cpp.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.cubemx-cpp/config.toml` - User-wide defaults
//! - Project: `.cubemx-cpp/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::shell::ColorChoice;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".cubemx-cpp";

/// cubemx-cpp configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rewrite settings
    pub convert: ConvertConfig,

    /// Console output settings
    pub output: OutputConfig,
}

/// Rewrite-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Rename superseded `.c` files to `.c.bak` (default: true)
    pub backup: Option<bool>,

    /// Only report what would change (default: false)
    pub dry_run: Option<bool>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Color mode: auto, always, never
    pub color: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.convert.backup.is_some() {
            self.convert.backup = other.convert.backup;
        }
        if other.convert.dry_run.is_some() {
            self.convert.dry_run = other.convert.dry_run;
        }
        if other.output.color.is_some() {
            self.output.color = other.output.color;
        }
    }

    pub fn backup(&self) -> bool {
        self.convert.backup.unwrap_or(true)
    }

    pub fn dry_run(&self) -> bool {
        self.convert.dry_run.unwrap_or(false)
    }

    /// Parse the color choice from config, ignoring invalid values.
    pub fn color(&self) -> Option<ColorChoice> {
        let value = self.output.color.as_ref()?;
        match value.parse() {
            Ok(choice) => Some(choice),
            Err(e) => {
                tracing::warn!("ignoring output.color: {}", e);
                None
            }
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cubemx-cpp/config.toml)
/// 2. Global config (~/.cubemx-cpp/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.cubemx-cpp).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.cubemx-cpp/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cubemx-cpp/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.backup());
        assert!(!config.dry_run());
        assert!(config.color().is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[convert]
backup = false

[output]
color = "never"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert!(!config.backup());
        assert!(!config.dry_run());
        assert_eq!(config.color(), Some(ColorChoice::Never));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[convert\nbackup = ").unwrap();

        let config = Config::load_or_default(&config_path);
        assert!(config.backup());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());

        std::fs::write(&global, "[convert]\nbackup = false\ndry_run = true\n").unwrap();
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(&project, "[convert]\ndry_run = false\n").unwrap();

        let config = load_config(Some(global.as_path()), &project);
        assert!(!config.backup()); // Not overridden
        assert!(!config.dry_run());
    }

    #[test]
    fn test_invalid_color_is_ignored() {
        let mut config = Config::default();
        config.output.color = Some("sometimes".to_string());
        assert!(config.color().is_none());
    }
}
