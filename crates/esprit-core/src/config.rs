//! Configuration and logging setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Application-level constants
pub const APP_NAME: &str = "EspritCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recent-visit entries kept when not configured.
pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Patients shown in the frequent list when not configured.
pub const DEFAULT_FREQUENT_COUNT: usize = 5;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Volatile, lost when the process exits
    #[default]
    Memory,
    /// SQLite database file
    Sqlite { path: PathBuf },
}

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClinicConfig {
    /// Persistence backend
    pub storage: StorageConfig,
    /// Capacity of the recent-visits structure
    pub recent_capacity: usize,
    /// Patients shown in the dashboard's frequent list
    pub frequent_count: usize,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            frequent_count: DEFAULT_FREQUENT_COUNT,
            log_filter: default_log_filter().to_string(),
        }
    }
}

impl ClinicConfig {
    /// SQLite-backed configuration with default settings.
    pub fn sqlite<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            storage: StorageConfig::Sqlite { path: path.into() },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn fallback_filter(&self) -> EnvFilter {
        EnvFilter::new(&self.log_filter)
    }

    /// Install logging with this config's fallback filter.
    ///
    /// Returns false if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        init_logging(&self.log_filter)
    }

    /// Reject settings the backend cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_capacity == 0 {
            return Err(ConfigError::Invalid(
                "recent_capacity must be at least 1".into(),
            ));
        }
        if self.frequent_count == 0 {
            return Err(ConfigError::Invalid(
                "frequent_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Default log filter for this crate.
pub fn default_log_filter() -> &'static str {
    "esprit_core=info"
}

/// Install a global fmt subscriber. `RUST_LOG` wins over `filter`.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .try_init()
        .is_ok()
}
