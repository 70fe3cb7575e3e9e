//! Schema synchronizer: brings the live table in line with the schema model.
//!
//! One IMMEDIATE transaction per migration:
//! 1. read live column metadata
//! 2. add missing columns, retype columns whose declared type differs
//! 3. drop columns no field maps to (the key and delete flag excepted)
//! 4. commit
//!
//! Any error rolls the whole transaction back, so the table is either fully
//! migrated or exactly as it was.

pub mod catalog;
pub mod ddl;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, TransactionBehavior};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{info, warn};

use scout_core::constants::FIXED_COLUMNS;
use scout_core::{GameConfig, StoreError, StoreResult};

use crate::connection::Database;
use crate::lock::LockMode;

pub use catalog::LiveColumn;
pub use ddl::{CopyOutcome, SchemaDdl, SqliteDdl};

const JOURNAL_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// What a migration changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub retyped: Vec<String>,
    pub dropped: Vec<String>,
    /// Retyped columns whose existing values could not be carried over.
    pub copy_failures: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.retyped.is_empty() && self.dropped.is_empty()
    }
}

/// Reconciles the store table with a schema model.
pub struct SchemaSynchronizer<'a, D: SchemaDdl = SqliteDdl> {
    db: &'a Database,
    ddl: D,
}

impl<'a> SchemaSynchronizer<'a, SqliteDdl> {
    pub fn new(db: &'a Database) -> Self {
        Self { db, ddl: SqliteDdl }
    }
}

impl<'a, D: SchemaDdl> SchemaSynchronizer<'a, D> {
    pub fn with_ddl(db: &'a Database, ddl: D) -> Self {
        Self { db, ddl }
    }

    /// Migrate the table to match `schema`.
    ///
    /// Validates the schema first; a schema that cannot map one-to-one onto
    /// columns never reaches the database.
    pub fn synchronize(&self, schema: &GameConfig) -> StoreResult<SyncReport> {
        schema.validate()?;

        self.db.locked(LockMode::Exclusive, "synchronize", || {
            let mut conn = self.db.connect()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            match self.reconcile(&tx, schema) {
                Ok(report) => {
                    tx.commit()?;
                    info!(
                        table = self.db.table_name(),
                        added = report.added.len(),
                        retyped = report.retyped.len(),
                        dropped = report.dropped.len(),
                        copy_failures = report.copy_failures.len(),
                        "Schema synchronized"
                    );
                    Ok(report)
                }
                Err(e) => {
                    warn!(table = self.db.table_name(), error = %e, "Schema migration failed, rolling back");
                    if let Err(rollback) = tx.rollback() {
                        warn!(error = %rollback, "Rollback reported an error");
                    }
                    Err(e)
                }
            }
        })
    }

    /// Current live columns of the store table.
    pub fn live_columns(&self) -> StoreResult<Vec<LiveColumn>> {
        let conn = self.db.connect()?;
        self.ddl.list_columns(&conn, self.db.table_name())
    }

    fn reconcile(&self, conn: &Connection, schema: &GameConfig) -> StoreResult<SyncReport> {
        let table = self.db.table_name();
        let builder = self.db.statements();

        let live = self.ddl.list_columns(conn, table)?;
        if live.is_empty() {
            return Err(StoreError::schema_conflict(format!(
                "table {table} does not exist; create the database first"
            )));
        }
        let live_types: FxHashMap<String, &str> = live
            .iter()
            .map(|c| (c.name.to_ascii_uppercase(), c.declared_type.as_str()))
            .collect();
        for fixed in FIXED_COLUMNS {
            if !live_types.contains_key(fixed) {
                return Err(StoreError::schema_conflict(format!(
                    "table {table} is missing fixed column {fixed}"
                )));
            }
        }

        let mut report = SyncReport::default();
        for field in schema.fields() {
            let column = field.column();
            let desired = builder.sql_type(field);
            match live_types.get(&column) {
                None => {
                    self.ddl.add_column(conn, table, &column, desired)?;
                    report.added.push(column);
                }
                Some(declared) if !desired.matches_declared(declared) => {
                    if let CopyOutcome::Lost(_) =
                        self.ddl.change_column_type(conn, table, &column, desired)?
                    {
                        report.copy_failures.push(column.clone());
                    }
                    report.retyped.push(column);
                }
                Some(_) => {}
            }
        }

        let canonical: FxHashSet<String> = schema.columns().into_iter().collect();
        for column in &live {
            let upper = column.name.to_ascii_uppercase();
            if FIXED_COLUMNS.contains(&upper.as_str()) || canonical.contains(&upper) {
                continue;
            }
            self.ddl.drop_column(conn, table, &column.name)?;
            report.dropped.push(column.name.clone());
        }

        Ok(report)
    }
}

/// Bootstrap a new store: create the file and its table in one statement.
///
/// Fails with `AlreadyExists` if the store file is already there. A failed
/// bootstrap removes the file it created along with its journal files.
pub fn create_database(db: &Database, schema: &GameConfig) -> StoreResult<()> {
    schema.validate()?;
    if db.exists() {
        return Err(StoreError::AlreadyExists(db.path().to_path_buf()));
    }
    if let Some(parent) = db.path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let ddl = db.statements().create_table(schema);
    let result = db
        .connect_creating()
        .and_then(|conn| conn.execute_batch(&ddl).map_err(StoreError::from));

    if let Err(e) = result {
        warn!(path = %db.path().display(), error = %e, "Database bootstrap failed");
        remove_store_files(db.path());
        return Err(e);
    }

    info!(
        path = %db.path().display(),
        table = db.table_name(),
        fields = schema.field_count(),
        "Database created"
    );
    Ok(())
}

/// Remove a store file and the journal files SQLite keeps beside it.
fn remove_store_files(path: &Path) {
    let mut targets = vec![path.to_path_buf()];
    for suffix in JOURNAL_SUFFIXES {
        let mut sibling = path.as_os_str().to_owned();
        sibling.push(suffix);
        targets.push(PathBuf::from(sibling));
    }
    for target in targets {
        match std::fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %target.display(), error = %e, "Failed to remove store file"),
        }
    }
}
