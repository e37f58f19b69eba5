//! Configuration handling for garden-feat
//!
//! Configuration is stored in `~/.config/garden-feat/config.toml` (or the
//! platform equivalent), or in a file named with `--config`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Feature directory used when nothing else is configured
pub const DEFAULT_FEATURE_DIR: &str = "../features";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory of feature descriptors
    pub feature_dir: Option<PathBuf>,

    /// Features always ignored, in addition to `--ignore`
    pub ignore: Vec<String>,
}

impl Config {
    /// Loads configuration from an explicit path or the default location
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::from_file(path)
            }
            None => match Self::global_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Returns the default config file path
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "gardenlinux", "garden-feat")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Resolves the feature directory: flag or environment, then config,
    /// then [`DEFAULT_FEATURE_DIR`]
    pub fn feature_dir(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.feature_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FEATURE_DIR))
    }
}
