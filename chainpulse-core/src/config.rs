//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chainpulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chainpulse/` (~/.config/chainpulse/)
//! - Data: `$XDG_DATA_HOME/chainpulse/` (~/.local/share/chainpulse/)
//! - State/Logs: `$XDG_STATE_HOME/chainpulse/` (~/.local/state/chainpulse/)

use crate::error::{Error, Result};
use crate::types::{CompareWindow, LabelMode, Network};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default dashboard parameters
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Network to report on (mainnet or testnet)
    #[serde(default)]
    pub network: Network,

    /// Trailing comparison window in days (30, 60 or 90)
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Growth label style ("percent" or "count")
    #[serde(default)]
    pub label_mode: LabelMode,

    /// How many entities the stacked views single out
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            window_days: default_window_days(),
            label_mode: LabelMode::default(),
            top_n: default_top_n(),
        }
    }
}

impl DashboardConfig {
    /// Resolve the configured window, rejecting unsupported widths.
    pub fn window(&self) -> Result<CompareWindow> {
        CompareWindow::from_days(self.window_days).ok_or_else(|| {
            Error::Config(format!(
                "dashboard.window_days must be 30, 60 or 90, got {}",
                self.window_days
            ))
        })
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_top_n() -> usize {
    10
}

/// Store configuration
#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    /// Override path for the SQLite database file
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.dashboard.window()?;
        Ok(config)
    }

    /// Returns the database file path, honoring the `[store]` override.
    pub fn resolved_database_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chainpulse/config.toml` (~/.config/chainpulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chainpulse").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite store)
    ///
    /// `$XDG_DATA_HOME/chainpulse/` (~/.local/share/chainpulse/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("chainpulse")
    }

    /// Returns the state directory path (for logs and saved settings)
    ///
    /// `$XDG_STATE_HOME/chainpulse/` (~/.local/state/chainpulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chainpulse")
    }

    /// Returns the default database file path
    ///
    /// `$XDG_DATA_HOME/chainpulse/data.db` (~/.local/share/chainpulse/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/chainpulse/chainpulse.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("chainpulse.log")
    }

    /// Returns the saved-settings file path
    ///
    /// `$XDG_STATE_HOME/chainpulse/settings.toml`
    pub fn settings_path() -> PathBuf {
        Self::state_dir().join("settings.toml")
    }
}
