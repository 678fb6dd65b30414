//! Application configuration.
//!
//! Stored at `~/.config/tripdesk/config.toml`; every key is optional and a
//! missing file means defaults. `TRIPDESK_CONFIG` points at another file and
//! `TRIPDESK_BASE_URL` overrides the backend address.

mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub use error::ConfigError;

use crate::model::FieldConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "TRIPDESK_CONFIG";
/// Environment variable overriding [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "TRIPDESK_BASE_URL";

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_routes_path")]
    pub routes_path: String,
    #[serde(default = "default_trips_path")]
    pub trips_path: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_routes_path() -> String {
    "/Routes".to_string()
}

fn default_trips_path() -> String {
    "/Trips".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            routes_path: default_routes_path(),
            trips_path: default_trips_path(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// How long a notification stays on screen.
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    /// TOML file replacing the built-in form layout.
    #[serde(default)]
    pub fields_file: Option<PathBuf>,

    /// Log file override; defaults to the data directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_notification_secs() -> u64 {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            notification_secs: default_notification_secs(),
            fields_file: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Returns the config file path: `TRIPDESK_CONFIG` if set, else the XDG location.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("tripdesk").join("config.toml"))
    }

    /// Loads the config file and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.override_base_url(std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    /// Loads configuration from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn override_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Notification lifetime.
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    /// Loads the form layout from `fields_file`, or the built-in layout when unset.
    pub fn field_config(&self) -> Result<FieldConfig, ConfigError> {
        let Some(path) = &self.fields_file else {
            return Ok(FieldConfig::builtin());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        FieldConfig::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })
    }

    /// Returns the log file path (`~/.local/share/tripdesk/tripdesk.log` by default).
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(dir.join("tripdesk").join("tripdesk.log"))
    }
}
