//! One error enum covering every store operation.

use std::path::PathBuf;

use super::error_code::{self, ScoutErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // Record codec
    #[error("Record shape mismatch: expected={expected}, got={got} tab-delimited segments")]
    RecordShape { expected: usize, got: usize },

    #[error("Invalid value for field '{field}': {value:?} ({reason})")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    // Schema synchronization
    #[error("Schema conflict: {message}")]
    SchemaConflict { message: String },

    #[error("Schema conflict on column {column} during {step}: {message}")]
    MigrationStep {
        column: String,
        step: &'static str,
        message: String,
    },

    // Lifecycle
    #[error("Store already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Store not initialized at {0}")]
    NotInitialized(PathBuf),

    #[error("Database has been shut down")]
    Shutdown,

    // Locking
    #[error("Store locked: {message} (operation: {operation})")]
    Locked { operation: String, message: String },

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Storage
    #[error("Storage I/O error: {0}")]
    StorageIo(#[from] rusqlite::Error),

    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn schema_conflict(message: impl Into<String>) -> Self {
        Self::SchemaConflict {
            message: message.into(),
        }
    }

    /// True for errors that reject a single record without touching storage.
    pub fn is_record_rejection(&self) -> bool {
        matches!(self, Self::RecordShape { .. } | Self::InvalidFieldValue { .. })
    }
}

impl ScoutErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RecordShape { .. } => error_code::RECORD_SHAPE,
            Self::InvalidFieldValue { .. } => error_code::INVALID_FIELD_VALUE,
            Self::SchemaConflict { .. } | Self::MigrationStep { .. } => error_code::SCHEMA_CONFLICT,
            Self::AlreadyExists(_) => error_code::ALREADY_EXISTS,
            Self::NotInitialized(_) => error_code::NOT_INITIALIZED,
            Self::Shutdown => error_code::SHUTDOWN,
            Self::Locked { .. } => error_code::LOCKED,
            Self::Config(_) => error_code::CONFIG_ERROR,
            Self::ConfigParse(_) | Self::Json(_) => error_code::CONFIG_PARSE_ERROR,
            Self::StorageIo(_) => error_code::STORAGE_IO,
            Self::Io(_) => error_code::IO_ERROR,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
