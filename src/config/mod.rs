use crate::errors::AppResult;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod settings;

pub use settings::Settings;

pub const DEFAULT_DATABASE: &str = "gps.db";

/// Contents of the optional YAML configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub serial: SerialConfig,
    /// Granularity of the runtime counter, in seconds.
    #[serde(default = "default_runtime_tick")]
    pub runtime_tick_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baudrate")]
    pub baudrate: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}
fn default_runtime_tick() -> u64 {
    5
}
fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_baudrate() -> u32 {
    9600
}
fn default_timeout_ms() -> u64 {
    3000
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baudrate: default_baudrate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            serial: SerialConfig::default(),
            runtime_tick_seconds: default_runtime_tick(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (~/.gpslogger)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gpslogger")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("gpslogger.conf")
    }

    /// Load the configuration from `path` (or the default location).
    /// A missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file(),
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }
}
