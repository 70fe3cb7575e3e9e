//! # scout-storage
//!
//! SQLite persistence layer for the scouting data store.
//! One short-lived connection per operation, statement generation from the
//! schema model, positional record codec, transactional schema
//! synchronization and read-only ad hoc queries.

pub mod codec;
pub mod connection;
pub mod gateway;
pub mod lock;
pub mod project;
pub mod statements;
pub mod sync;

pub use connection::Database;
pub use gateway::{QueryGateway, TabularResult};
pub use lock::SchemaLock;
pub use project::ScoutProject;
pub use statements::{BuiltStatement, StatementBuilder};
pub use sync::{create_database, SchemaDdl, SchemaSynchronizer, SqliteDdl, SyncReport};
