pub mod logging_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};

pub use logging_config::LoggingConfig;
pub use storage_config::StorageConfig;

/// Top-level settings aggregating all subsystem configs (`scout.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoutConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl ScoutConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load config from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&raw)?)
    }

    pub fn to_toml(&self) -> StoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ScoutConfig::from_toml("").unwrap();
        assert_eq!(config.storage.effective_table_name(), "SCOUTING");
        assert_eq!(config.storage.effective_varchar_length(), 255);
        assert_eq!(config.logging.effective_filter(), "info");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = ScoutConfig::from_toml(
            r#"
            [storage]
            table_name = "MATCHES"
            schema_lock = false

            [logging]
            filter = "scout_storage=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.effective_table_name(), "MATCHES");
        assert!(!config.storage.effective_schema_lock());
        assert_eq!(config.storage.effective_busy_timeout_ms(), 5000);
        assert_eq!(config.logging.effective_filter(), "scout_storage=debug");
    }

    #[test]
    fn unknown_types_are_parse_errors() {
        assert!(ScoutConfig::from_toml("[storage]\nvarchar_length = \"wide\"").is_err());
    }

    #[test]
    fn toml_round_trip_keeps_overrides() {
        let mut config = ScoutConfig::default();
        config.storage.table_name = Some("MATCHES".to_string());
        config.storage.varchar_length = Some(64);
        let back = ScoutConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(back.storage, config.storage);
        assert!(back.logging.filter.is_none());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = ScoutConfig::load(Path::new("/nonexistent/scout.toml")).unwrap();
        assert!(config.storage.table_name.is_none());
    }
}
