//! Advisory schema lock via fd-lock.
//!
//! Migrations take the exclusive lock, record writes take the shared lock.
//! Both are non-blocking: a conflicting holder yields `StoreError::Locked`.
//! Ad hoc reads do not lock and rely on SQLite isolation.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fd_lock::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use scout_core::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Record writes. Any number may run together.
    Shared,
    /// Schema migration. Excludes everything else.
    Exclusive,
}

/// Lock file living next to the store file (`scout.db.lock`).
pub struct SchemaLock {
    lock_file: RwLock<File>,
    lock_path: PathBuf,
}

/// Held lock. Released on drop.
pub struct LockGuard<'a> {
    _shared: Option<RwLockReadGuard<'a, File>>,
    _exclusive: Option<RwLockWriteGuard<'a, File>>,
}

impl SchemaLock {
    pub fn for_database(db_path: &Path) -> StoreResult<Self> {
        let mut lock_path = db_path.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        Ok(Self {
            lock_file: RwLock::new(file),
            lock_path,
        })
    }

    pub fn acquire(&mut self, mode: LockMode, operation: &str) -> StoreResult<LockGuard<'_>> {
        debug!(?mode, operation, "Acquiring schema lock");
        match mode {
            LockMode::Shared => {
                let guard = self.lock_file.try_read().map_err(|_| StoreError::Locked {
                    operation: operation.to_string(),
                    message: "A schema migration is in progress. Try again shortly.".to_string(),
                })?;
                Ok(LockGuard {
                    _shared: Some(guard),
                    _exclusive: None,
                })
            }
            LockMode::Exclusive => {
                let guard = self.lock_file.try_write().map_err(|_| StoreError::Locked {
                    operation: operation.to_string(),
                    message: "Another operation is using the store. Wait for it to complete."
                        .to_string(),
                })?;
                Ok(LockGuard {
                    _shared: None,
                    _exclusive: Some(guard),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_file_sits_next_to_database() {
        let dir = TempDir::new().unwrap();
        let lock = SchemaLock::for_database(&dir.path().join("scout.db")).unwrap();
        assert_eq!(lock.path(), dir.path().join("scout.db.lock"));
        assert!(lock.path().exists());
    }

    #[test]
    fn shared_locks_coexist() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("scout.db");
        let mut a = SchemaLock::for_database(&db).unwrap();
        let mut b = SchemaLock::for_database(&db).unwrap();
        let _ga = a.acquire(LockMode::Shared, "insert").unwrap();
        assert!(b.acquire(LockMode::Shared, "insert").is_ok());
    }

    #[test]
    fn exclusive_excludes_shared() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("scout.db");
        let mut a = SchemaLock::for_database(&db).unwrap();
        let mut b = SchemaLock::for_database(&db).unwrap();
        let _ga = a.acquire(LockMode::Exclusive, "synchronize").unwrap();
        let err = b.acquire(LockMode::Shared, "insert").err().unwrap();
        assert!(matches!(err, StoreError::Locked { .. }), "{err}");
    }

    #[test]
    fn released_on_drop() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("scout.db");
        let mut a = SchemaLock::for_database(&db).unwrap();
        let mut b = SchemaLock::for_database(&db).unwrap();
        {
            let _ga = a.acquire(LockMode::Shared, "insert").unwrap();
            assert!(b.acquire(LockMode::Exclusive, "synchronize").is_err());
        }
        assert!(b.acquire(LockMode::Exclusive, "synchronize").is_ok());
    }
}
