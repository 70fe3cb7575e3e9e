//! Stable error code strings for callers that branch on error kind
//! without matching on the enum (UI layers, logs).

pub const RECORD_SHAPE: &str = "RECORD_SHAPE";
pub const INVALID_FIELD_VALUE: &str = "INVALID_FIELD_VALUE";
pub const SCHEMA_CONFLICT: &str = "SCHEMA_CONFLICT";
pub const STORAGE_IO: &str = "STORAGE_IO";
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
pub const NOT_INITIALIZED: &str = "NOT_INITIALIZED";
pub const SHUTDOWN: &str = "SHUTDOWN";
pub const LOCKED: &str = "LOCKED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";

/// Maps an error to its stable code.
pub trait ScoutErrorCode {
    fn error_code(&self) -> &'static str;
}
