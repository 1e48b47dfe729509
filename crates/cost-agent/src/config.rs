//! Agent configuration

use anyhow::{Context, Result};
use cost_engine::{ComponentHealth, RateTable, StoragePolicy};
use serde::Deserialize;
use std::fmt;

/// Agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Instance name attached to structured log events
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// HTTP port for the API, health and metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Optional JSON rate table replacing the built-in rates
    #[serde(default)]
    pub rates_file: Option<String>,

    /// Storage archival rule used when a request does not pick one
    #[serde(default)]
    pub storage_policy: StoragePolicy,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "cost-agent".to_string())
}

fn default_api_port() -> u16 {
    8080
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            rates_file: None,
            storage_policy: StoragePolicy::default(),
        }
    }
}

/// Where the served rate table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    /// Compiled-in placeholder rates
    BuiltIn,
    /// JSON rate table at the given path
    File(String),
}

impl RateSource {
    /// Health of the rate table component; built-in rates serve in degraded mode
    pub fn health(&self) -> ComponentHealth {
        match self {
            RateSource::BuiltIn => {
                ComponentHealth::degraded("Using built-in rates; set AGENT_RATES_FILE")
            }
            RateSource::File(_) => ComponentHealth::healthy(),
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::BuiltIn => f.write_str("built-in"),
            RateSource::File(path) => f.write_str(path),
        }
    }
}

impl AgentConfig {
    /// Load configuration from `AGENT_*` environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("AGENT").try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("Invalid agent configuration")
    }

    /// Rate table to serve, and where it came from
    pub fn load_rates(&self) -> Result<(RateTable, RateSource)> {
        match &self.rates_file {
            Some(path) => {
                let rates = RateTable::from_file(path)
                    .with_context(|| format!("Failed to load rate table from {}", path))?;
                Ok((rates, RateSource::File(path.clone())))
            }
            None => Ok((RateTable::default(), RateSource::BuiltIn)),
        }
    }
}
