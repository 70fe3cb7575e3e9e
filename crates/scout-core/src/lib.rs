//! # scout-core
//!
//! Foundation crate for the scouting data store.
//! Defines the schema model, the column identifier rule, errors, config and
//! logging setup. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod identifier;
pub mod logging;
pub mod schema;

// Re-export the most commonly used types at the crate root.
pub use config::{LoggingConfig, ScoutConfig, StorageConfig};
pub use errors::{StoreError, StoreResult};
pub use identifier::{normalize, quote};
pub use schema::{Choice, FieldSpec, FieldType, GameConfig, SectionSpec, SqlType};
