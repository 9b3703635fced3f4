//! Application configuration loaded from JSON.

use anyhow::{Context, Result};
use cueline_playback::{ClockConfig, PlaybackConfig};
use cueline_timeline::FactoryConfig;
use cueline_ui::DragConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "CUELINE_CONFIG";

/// Every tunable of a session. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub clock: ClockConfig,
    pub playback: PlaybackConfig,
    pub drag: DragConfig,
    pub factory: FactoryConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&data)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config
            .factory
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config
            .playback
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `explicit`, else from `$CUELINE_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}
