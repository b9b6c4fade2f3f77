//! Configuration loading for the monitor service
//!
//! Values resolve in priority order: command-line flags (handled by the
//! binary) > TOML config file > compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Monitor service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    pub port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Seconds between ingestion cycles on each monitoring connection
    pub monitor_interval_secs: u64,
    /// Seconds between background reconciliation sweeps
    pub sweep_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            host: "0.0.0.0".to_string(),
            port: 5780,
            database_path: default_database_path(),
            monitor_interval_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file, or compiled defaults when no
    /// file is given and none exists at the default location.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(p) => {
                let content = std::fs::read_to_string(&p)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", p.display(), e)))
            }
            None => Ok(MonitorConfig::default()),
        }
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Default config file location: ~/.config/carewatch/config.toml
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("carewatch").join("config.toml"))
}

/// Default database location: OS data dir, falling back to the working
/// directory.
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("carewatch").join("carewatch.db"))
        .unwrap_or_else(|| PathBuf::from("carewatch.db"))
}
