use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for the dashboard. Every field has a default, so a config file
/// only needs the values it wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub refresh_interval_secs: u64,
    pub top_processes: usize,
    pub max_connections: usize,
    pub max_interfaces: usize,
    pub firmware_timeout_secs: u64,
    pub package_timeout_secs: u64,
    pub sudo_timeout_secs: u64,
    /// Deadline for helpers the collectors run on every refresh (`lsof`, `id`).
    pub tool_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 2,
            top_processes: 20,
            max_connections: 20,
            max_interfaces: 5,
            firmware_timeout_secs: 5,
            package_timeout_secs: 10,
            sudo_timeout_secs: 2,
            tool_timeout_secs: 5,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config("refresh_interval_secs must be at least 1".into()));
        }
        if self.top_processes == 0 {
            return Err(Error::Config("top_processes must be at least 1".into()));
        }
        if self.tool_timeout_secs == 0 {
            return Err(Error::Config("tool_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}
