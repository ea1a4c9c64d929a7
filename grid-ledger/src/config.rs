//! Configuration for the microgrid ledger

use crate::credits::DEFAULT_CREDITS_PER_UNIT;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// Owner principal allowed to toggle node activation
    pub owner: NodeId,

    /// Energy-to-credit conversion rate
    pub credits_per_unit: u64,

    /// Warn when the outbound event queue exceeds this depth
    pub event_queue_warn_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "grid-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            owner: NodeId::new("grid-operator"),
            credits_per_unit: DEFAULT_CREDITS_PER_UNIT,
            event_queue_warn_depth: 10_000,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(owner) = std::env::var("GRID_OWNER") {
            config.owner = NodeId::new(owner);
        }

        if let Ok(addr) = std::env::var("GRID_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(rate) = std::env::var("GRID_CREDITS_PER_UNIT") {
            config.credits_per_unit = rate
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad GRID_CREDITS_PER_UNIT: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.credits_per_unit == 0 {
            return Err(crate::Error::Config(
                "credits_per_unit must be positive".to_string(),
            ));
        }
        if self.owner.as_str().is_empty() {
            return Err(crate::Error::Config("owner must be set".to_string()));
        }
        Ok(())
    }
}
