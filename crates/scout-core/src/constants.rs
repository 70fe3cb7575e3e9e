//! Fixed names shared by every component.

/// Auto-incrementing primary key column.
pub const ID_COLUMN: &str = "ID";

/// Soft-delete marker column.
pub const DELETED_COLUMN: &str = "DELETED";

/// Columns every store table carries regardless of schema.
pub const FIXED_COLUMNS: [&str; 2] = [ID_COLUMN, DELETED_COLUMN];

/// Default table holding scouting records.
pub const DEFAULT_TABLE_NAME: &str = "SCOUTING";

/// Default bound for string-backed columns.
pub const DEFAULT_VARCHAR_LENGTH: u32 = 255;

/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Stored code for a boolean field set to `"true"`.
pub const BOOLEAN_TRUE_CODE: &str = "T";

/// Stored code for a boolean field set to anything else.
pub const BOOLEAN_FALSE_CODE: &str = "F";

/// File names that make up a project directory.
pub const GAME_CONFIG_FILE: &str = "game_config.json";
pub const DATABASE_FILE: &str = "scout.db";
pub const SETTINGS_FILE: &str = "scout.toml";
