//! Bootstrap configuration for the culture relay
//!
//! Settings are resolved once at startup, highest priority first:
//!
//! 1. Command-line arguments and `CULTURE_*` environment variables
//!    (both arrive as [`ConfigOverrides`], the binary's CLI layer merges them)
//! 2. TOML configuration file
//! 3. Built-in defaults (code constants)
//!
//! The resolved [`RelayConfig`] cannot change while the service is running.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7777";
pub const DEFAULT_UPLOAD_ROOT: &str = "uploaded_images";
pub const DEFAULT_DATABASE_PATH: &str = "culture_relay.db";
pub const DEFAULT_SEGMENTATION_ENDPOINT: &str = "http://127.0.0.1:5000/segment";
pub const DEFAULT_COLOR_ENDPOINT: &str = "http://127.0.0.1:8096/color";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Configuration file as written on disk
///
/// Every field is optional; anything missing falls back to the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Socket address the HTTP server binds to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Root folder holding uploaded and segmented images
    #[serde(default)]
    pub upload_root: Option<PathBuf>,

    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// URL of the remote segmentation service
    #[serde(default)]
    pub segmentation_endpoint: Option<String>,

    /// URL of the remote color-extraction service
    #[serde(default)]
    pub color_endpoint: Option<String>,

    /// Client timeout for segmentation calls; unset means no timeout
    #[serde(default)]
    pub segmentation_timeout_secs: Option<u64>,

    /// Maximum accepted request body size
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
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

/// Command-line / environment overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub upload_root: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub segmentation_endpoint: Option<String>,
    pub color_endpoint: Option<String>,
    pub segmentation_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_address: SocketAddr,
    pub upload_root: PathBuf,
    pub database_path: PathBuf,
    pub segmentation_endpoint: String,
    pub color_endpoint: String,
    pub segmentation_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl RelayConfig {
    /// Load configuration from an optional TOML file and apply overrides
    ///
    /// An explicitly given `config_path` must exist. Without one, the
    /// platform default location is used when present, otherwise built-in
    /// defaults apply.
    pub async fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match config_path {
            Some(path) => load_toml_config(path).await?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => load_toml_config(&path).await?,
                None => {
                    info!("No config file found, using built-in defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::resolve(overrides, toml_config)
    }

    /// Merge overrides, TOML values and defaults, then validate the result
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let bind_address = overrides
            .bind_address
            .or(toml_config.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address: SocketAddr = bind_address.parse().map_err(|e| {
            Error::Config(format!("Invalid bind address '{}': {}", bind_address, e))
        })?;

        let segmentation_endpoint = overrides
            .segmentation_endpoint
            .or(toml_config.segmentation_endpoint)
            .unwrap_or_else(|| DEFAULT_SEGMENTATION_ENDPOINT.to_string());
        validate_endpoint("segmentation_endpoint", &segmentation_endpoint)?;

        let color_endpoint = overrides
            .color_endpoint
            .or(toml_config.color_endpoint)
            .unwrap_or_else(|| DEFAULT_COLOR_ENDPOINT.to_string());
        validate_endpoint("color_endpoint", &color_endpoint)?;

        let max_upload_bytes = overrides
            .max_upload_bytes
            .or(toml_config.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than zero".to_string()));
        }

        let segmentation_timeout = match overrides
            .segmentation_timeout_secs
            .or(toml_config.segmentation_timeout_secs)
        {
            Some(0) => {
                warn!("segmentation_timeout_secs = 0 disables the timeout");
                None
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            bind_address,
            upload_root: overrides
                .upload_root
                .or(toml_config.upload_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT)),
            database_path: overrides
                .database_path
                .or(toml_config.database_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            segmentation_endpoint,
            color_endpoint,
            segmentation_timeout,
            max_upload_bytes,
            log_level: overrides.log_level.unwrap_or(toml_config.logging.level),
        })
    }
}

/// Read and parse a TOML configuration file
pub async fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

    let config: TomlConfig = toml::from_str(&toml_str)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {:?}: {}", path, e)))?;

    info!("Loaded TOML configuration from {:?}", path);
    Ok(config)
}

/// Platform default config file location (`<config_dir>/culture-relay/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("culture-relay").join("config.toml"))
}

fn validate_endpoint(name: &str, url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", name)));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            name, url
        )));
    }
    Ok(())
}
