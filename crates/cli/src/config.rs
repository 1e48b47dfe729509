//! Configuration management for the CLI

use anyhow::{Context, Result};
use cost_engine::RateTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration, read from `~/.config/cco/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider used when `--provider` is not given
    pub default_provider: Option<String>,
    /// JSON rate table used when `--rates` is not given
    pub rates_file: Option<String>,
    /// Default output format (`table` or `json`)
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("cco").join("config.json"))
    }

    /// Output format: the flag wins, then the config file, then table
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or_else(|| {
            self.default_format
                .as_deref()
                .and_then(OutputFormat::from_name)
        })
        .unwrap_or_default()
    }

    /// Provider: the flag wins, then the config file, then AWS
    pub fn provider(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.default_provider.clone())
            .unwrap_or_else(|| "AWS".to_string())
    }

    /// Rate table: `--rates` wins, then the config file, then built-in rates
    pub fn rate_table(&self, flag: Option<&str>) -> Result<RateTable> {
        match flag.or(self.rates_file.as_deref()) {
            Some(path) => RateTable::from_file(path)
                .with_context(|| format!("Failed to load rate table from {}", path)),
            None => Ok(RateTable::default()),
        }
    }
}
