//! `Database`: the connection factory every component is handed.
//!
//! Owns the store's path and settings plus an explicit open/shutdown
//! lifecycle. Each operation asks for a fresh connection and drops it when
//! done; there is no pooling and no connection outlives an operation.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use scout_core::{StorageConfig, StoreError, StoreResult};

use crate::lock::{LockMode, SchemaLock};
use crate::statements::StatementBuilder;

pub use pragmas::configure_connection;

/// Connection factory for one store file.
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    config: StorageConfig,
    open: AtomicBool,
}

impl Database {
    /// Start the factory. Touches nothing on disk.
    pub fn open(path: impl Into<PathBuf>, config: StorageConfig) -> Self {
        let path = path.into();
        info!(path = %path.display(), table = config.effective_table_name(), "Database opened");
        Self {
            path,
            config,
            open: AtomicBool::new(true),
        }
    }

    /// Stop handing out connections. Connections already in use finish normally.
    pub fn shutdown(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!(path = %self.path.display(), "Database shut down");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Whether the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn table_name(&self) -> &str {
        self.config.effective_table_name()
    }

    /// Statement builder bound to this store's table and column settings.
    pub fn statements(&self) -> StatementBuilder {
        StatementBuilder::from_config(&self.config)
    }

    /// Open a connection to an existing store.
    pub fn connect(&self) -> StoreResult<Connection> {
        if !self.exists() {
            return Err(StoreError::NotInitialized(self.path.clone()));
        }
        self.connect_with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX)
    }

    /// Open a connection, creating the store file. Bootstrap only.
    pub(crate) fn connect_creating(&self) -> StoreResult<Connection> {
        self.connect_with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn connect_with_flags(&self, flags: OpenFlags) -> StoreResult<Connection> {
        if !self.is_open() {
            return Err(StoreError::Shutdown);
        }
        let conn = Connection::open_with_flags(&self.path, flags)?;
        configure_connection(&conn, self.config.effective_busy_timeout_ms())?;
        debug!(path = %self.path.display(), "Connection acquired");
        Ok(conn)
    }

    /// Run `f` while holding the schema lock in `mode`.
    /// A no-op wrapper when `schema_lock` is disabled.
    pub(crate) fn locked<T>(
        &self,
        mode: LockMode,
        operation: &str,
        f: impl FnOnce() -> StoreResult<T>,
    ) -> StoreResult<T> {
        if !self.config.effective_schema_lock() {
            return f();
        }
        let mut lock = SchemaLock::for_database(&self.path)?;
        let _guard = lock.acquire(mode, operation)?;
        f()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.shutdown();
    }
}
