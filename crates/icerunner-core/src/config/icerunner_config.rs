use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{deck_config::DeckConfig, logging_config::LoggingConfig, paths::ProjectPaths};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to determine config directory")]
    NoConfigDir,
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("IO error reading config: {0}")]
    IoError(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IceRunnerConfig {
    #[serde(default)]
    pub deck: DeckConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IceRunnerConfig {
    pub fn config_path() -> Result<PathBuf, ConfigLoadError> {
        let proj_paths = ProjectPaths::new("icerunner").ok_or(ConfigLoadError::NoConfigDir)?;
        Ok(proj_paths.config_dir().join("config.toml"))
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound(path.to_path_buf()));
        }

        let content =
            fs::read_to_string(path).map_err(|e| ConfigLoadError::IoError(e.to_string()))?;
        let config =
            toml::from_str(&content).map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
