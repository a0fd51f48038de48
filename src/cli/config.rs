//! Configuration file support.

use crate::store::paths::DataDirs;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Default data directory
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/nook/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nook")
            .join("config.toml")
    }

    /// Resolve the data directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `data_dir` setting
    /// 3. Platform data directory (e.g. `~/.local/share/nook`)
    pub fn data_dir(&self, cli_dir: Option<&PathBuf>) -> Option<DataDirs> {
        cli_dir
            .cloned()
            .or_else(|| self.data_dir.clone())
            .map(DataDirs::new)
            .or_else(|| DataDirs::default_root().map(DataDirs::new))
    }
}
