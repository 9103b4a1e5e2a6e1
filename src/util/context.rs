//! Global context for cubemx-cpp operations.
//!
//! Provides centralized access to the project directory and the merged
//! configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Directory holding the generated project
    project_dir: PathBuf,

    /// Merged global and project configuration
    config: Config,
}

impl GlobalContext {
    /// Create a context for the current working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_project_dir(cwd))
    }

    /// Create a context for a specific project directory.
    pub fn with_project_dir(project_dir: PathBuf) -> Self {
        let global = global_config_path();
        let config = load_config(global.as_deref(), &project_config_path(&project_dir));

        GlobalContext {
            project_dir,
            config,
        }
    }

    /// Get the project directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
