//! Storage configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_TABLE_NAME, DEFAULT_VARCHAR_LENGTH};

/// Configuration for the SQLite-backed record store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Table holding scouting records. Default: "SCOUTING".
    pub table_name: Option<String>,
    /// Bound for string-backed columns. Default: 255.
    pub varchar_length: Option<u32>,
    /// SQLite busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u32>,
    /// Take the advisory schema lock around migrations and writes. Default: true.
    pub schema_lock: Option<bool>,
}

impl StorageConfig {
    pub fn effective_table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }

    pub fn effective_varchar_length(&self) -> u32 {
        self.varchar_length.unwrap_or(DEFAULT_VARCHAR_LENGTH)
    }

    pub fn effective_busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn effective_schema_lock(&self) -> bool {
        self.schema_lock.unwrap_or(true)
    }
}
