use crate::core::db::ConnectionSettings;
use crate::core::{Result, SqlcmdError};
use crate::manager::IdColumn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Value of `manager.id_column` that selects the table's primary key
const PRIMARY_KEY: &str = "primary_key";

/// Top-level configuration structure parsed from a TOML file.
///
/// Every section is optional; missing values fall back to defaults.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub manager: ManagerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PostgreSQL server location.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub connect_timeout_secs: Option<u64>,
    pub application_name: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: None,
            application_name: None,
        }
    }
}

/// DatabaseManager behavior.
#[derive(Debug, Deserialize)]
pub struct ManagerConfig {
    /// Column matched by `delete`, or "primary_key"
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            id_column: default_id_column(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
        }
    }
}

fn default_host() -> String {
    crate::core::db::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    crate::core::db::DEFAULT_PORT
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// `<config dir>/sqlcmd/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlcmd").join("config.toml"))
    }

    /// Server settings for `DatabaseManager`
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.server.host.clone(),
            port: self.server.port,
            connect_timeout: self.server.connect_timeout_secs.map(Duration::from_secs),
            application_name: self
                .server
                .application_name
                .clone()
                .or_else(|| ConnectionSettings::default().application_name),
        }
    }

    /// The identifying column used by `delete`
    pub fn id_column(&self) -> IdColumn {
        if self.manager.id_column == PRIMARY_KEY {
            IdColumn::PrimaryKey
        } else {
            IdColumn::Named(self.manager.id_column.clone())
        }
    }

    /// The configured log level
    ///
    /// # Errors
    ///
    /// Returns `SqlcmdError::Config` for anything other than
    /// trace/debug/info/warn/error (case-insensitive).
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| SqlcmdError::Config(format!("unknown log level {:?}", self.logging.level)))
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqlcmd::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
