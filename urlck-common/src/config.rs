//! Configuration loading and database path resolution
//!
//! Bootstrap configuration comes from an optional TOML file. Every value has a
//! built-in default, so a missing file is not an error unless it was requested
//! explicitly on the command line or through the environment.
//!
//! # Priority order
//!
//! Config file: `--config` > `URLCK_CONFIG` > `~/.config/urlck/config.toml` > `/etc/urlck/config.toml`
//!
//! Database path: `--database` > `URLCK_DATABASE` > TOML `database_path` > OS default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "URLCK_CONFIG";

/// Environment variable naming the catalog database file
pub const DATABASE_ENV_VAR: &str = "URLCK_DATABASE";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Path to the catalog SQLite database (optional)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Attribute codes inspected by the checkers
    #[serde(default)]
    pub attributes: AttributeConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Attribute codes inspected by the checkers
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeConfig {
    #[serde(default = "default_url_key_attribute")]
    pub url_key: String,

    #[serde(default = "default_url_path_attribute")]
    pub url_path: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            url_key: default_url_key_attribute(),
            url_path: default_url_path_attribute(),
        }
    }
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

fn default_url_key_attribute() -> String {
    "url_key".to_string()
}

fn default_url_path_attribute() -> String {
    "url_path".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: TomlConfig = toml::from_str(&toml_str)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration following the priority order
    ///
    /// An explicitly requested file (CLI or environment) must exist. When
    /// falling back to the platform locations a missing file is not an error
    /// and the built-in defaults are used. Nothing is logged here since the
    /// config is read before tracing is set up; call [`ConfigSource::log`]
    /// once it is.
    pub fn load(cli_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match cli_path {
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => default_config_file(),
            },
        };

        match path {
            Some(path) => Ok((Self::from_file(&path)?, ConfigSource::File(path))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Reject values the checkers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.attributes.url_key.trim().is_empty() {
            return Err(Error::Config("attributes.url_key must not be empty".to_string()));
        }
        if self.attributes.url_path.trim().is_empty() {
            return Err(Error::Config("attributes.url_path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Defaults => warn!("No config file found, using built-in defaults"),
        }
    }
}

/// Find the config file in the platform locations, if any exists
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("urlck").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/urlck/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the catalog database path
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!("Database path from command line");
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        debug!("Database path from {}", DATABASE_ENV_VAR);
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database_path {
        debug!("Database path from config file");
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    get_default_database_path()
}

/// Get OS-dependent default catalog database path
pub fn get_default_database_path() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/urlck (or /var/lib/urlck for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("urlck"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/urlck"))
            .join("catalog.db")
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("urlck"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/urlck"))
            .join("catalog.db")
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("urlck"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\urlck"))
            .join("catalog.db")
    } else {
        PathBuf::from("./urlck_data/catalog.db")
    }
}
