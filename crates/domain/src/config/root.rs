use serde::{Deserialize, Serialize};

use super::database::DatabaseConfig;
use super::errors::ConfigError;
use super::housekeeping::HousekeepingConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::zone::ZoneConfig;
use crate::zone::Zone;

const LOCAL_CONFIG: &str = "flatboat.toml";
const SYSTEM_CONFIG: &str = "/etc/flatboat/config.toml";

/// Main configuration structure for flatboat
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, workers)
    #[serde(default)]
    pub server: ServerConfig,

    /// Served zone, SOA names and built-in overrides
    #[serde(default)]
    pub zone: ZoneConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub housekeeping: HousekeepingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. flatboat.toml in current directory
    /// 3. /etc/flatboat/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.udp_workers == 0 {
            return Err(ConfigError::Validation(
                "At least one UDP worker is required".to_string(),
            ));
        }

        let zone =
            Zone::from_config(&self.zone).map_err(|e| ConfigError::Validation(e.to_string()))?;

        for o in &self.zone.overrides {
            if !zone.contains(&o.name) {
                return Err(ConfigError::Validation(format!(
                    "Override '{}' is outside zone {}",
                    o.name,
                    zone.apex()
                )));
            }
        }

        let db = &self.database;
        if db.request_log_channel_capacity == 0
            || db.request_log_max_batch_size == 0
            || db.request_log_flush_interval_ms == 0
        {
            return Err(ConfigError::Validation(
                "Request log channel capacity, batch size and flush interval must be positive"
                    .to_string(),
            ));
        }

        if self.housekeeping.enabled && self.housekeeping.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Housekeeping interval cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}
