use std::time::Duration;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::client::TlsIdentity;

pub const APP_NAME: &str = "freezer";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URI of the storage server
    #[serde(default)]
    pub host: Option<Url>,
    /// Account name used at login
    #[serde(default)]
    pub user: Option<String>,
    /// Client certificate (PEM) for mutual TLS, also trusted as the server root
    #[serde(default)]
    pub tls_cert: Option<PathBuf>,
    /// Private key (PEM) matching `tls_cert`
    #[serde(default)]
    pub tls_key: Option<PathBuf>,
    /// Per-request deadline in seconds (transport default if unset)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (stderr only if unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            tls_cert: None,
            tls_key: None,
            request_timeout_secs: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// The TLS identity, when both halves are configured.
    pub fn tls_identity(&self) -> Option<TlsIdentity> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some(TlsIdentity {
                cert_path: cert.clone(),
                key_path: key.clone(),
            }),
            _ => None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the freezer directory (~/.freezer)
    pub freezer_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the freezer directory path (custom or default ~/.freezer)
    pub fn freezer_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Load state from the freezer directory. A missing directory or config
    /// file yields the default configuration.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let freezer_dir = Self::freezer_dir(custom_path)?;
        let config_path = freezer_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            AppConfig::default()
        };

        Ok(Self {
            freezer_dir,
            config_path,
            config,
        })
    }

    /// Write the current configuration back to disk.
    pub fn save(&self) -> Result<(), StateError> {
        fs::create_dir_all(&self.freezer_dir)?;
        let config_toml = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_toml)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
