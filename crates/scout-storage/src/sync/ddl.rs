//! DDL primitives the synchronizer is built from.
//!
//! SQLite can add, drop and rename columns but cannot change a column's
//! type, so `change_column_type` defaults to add-temp / copy / drop / rename.
//! A store with native type alteration overrides that one method.

use rusqlite::Connection;
use tracing::{debug, warn};

use scout_core::constants::{BOOLEAN_FALSE_CODE, BOOLEAN_TRUE_CODE};
use scout_core::{quote, SqlType, StoreError, StoreResult};

use super::catalog::{self, LiveColumn};

/// Result of the best-effort value copy during a type change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Some or all existing values did not survive the conversion.
    Lost(String),
}

/// Schema primitives against one connection. Every call runs inside the
/// caller's transaction.
pub trait SchemaDdl {
    fn list_columns(&self, conn: &Connection, table: &str) -> StoreResult<Vec<LiveColumn>>;

    fn add_column(&self, conn: &Connection, table: &str, column: &str, sql_type: SqlType)
        -> StoreResult<()>;

    /// Copy `from` into `to`, converting each value to `sql_type`.
    /// Returns how many non-blank values could not be converted and were
    /// left NULL.
    fn copy_values(
        &self,
        conn: &Connection,
        table: &str,
        from: &str,
        to: &str,
        sql_type: SqlType,
    ) -> StoreResult<usize>;

    fn drop_column(&self, conn: &Connection, table: &str, column: &str) -> StoreResult<()>;

    fn rename_column(&self, conn: &Connection, table: &str, from: &str, to: &str)
        -> StoreResult<()>;

    /// Give `column` the type `sql_type`, keeping its name.
    ///
    /// Values that do not convert, or a copy that fails outright, are logged
    /// and reported, not returned: the migration continues without them. Any
    /// other step failing is an error.
    fn change_column_type(
        &self,
        conn: &Connection,
        table: &str,
        column: &str,
        sql_type: SqlType,
    ) -> StoreResult<CopyOutcome> {
        // Normalized identifiers never contain "__".
        let temp = format!("{column}__TMP");

        self.add_column(conn, table, &temp, sql_type)?;
        let outcome = match self.copy_values(conn, table, column, &temp, sql_type) {
            Ok(0) => CopyOutcome::Copied,
            Ok(lost) => {
                warn!(column, lost, sql_type = %sql_type.declaration(), "Values did not convert during type change");
                CopyOutcome::Lost(format!("{lost} value(s) did not convert to {}", sql_type.declaration()))
            }
            Err(e) => {
                warn!(column, error = %e, "Value copy failed during type change; existing values dropped");
                CopyOutcome::Lost(e.to_string())
            }
        };
        self.drop_column(conn, table, column)?;
        self.rename_column(conn, table, &temp, column)?;
        debug!(column, sql_type = %sql_type.declaration(), "Column type changed");
        Ok(outcome)
    }
}

/// `SchemaDdl` for SQLite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDdl;

fn step_err<'a>(column: &'a str, step: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError + 'a {
    move |e| StoreError::MigrationStep {
        column: column.to_string(),
        step,
        message: e.to_string(),
    }
}

/// SQL expression converting `source` into a value stored as `sql_type`,
/// NULL where it does not convert.
///
/// - INTEGER: only text or numbers that read back identically as integers
/// - CHAR(1): `T`/`true` become the true code, blank NULL, the rest the false code
/// - VARCHAR: the value as text
fn conversion(source: &str, sql_type: SqlType) -> String {
    match sql_type {
        SqlType::Integer => format!(
            "CASE WHEN CAST(CAST({source} AS INTEGER) AS TEXT) = CAST({source} AS TEXT) \
             THEN CAST({source} AS INTEGER) END"
        ),
        SqlType::Boolean => format!(
            "CASE WHEN {source} IS NULL OR CAST({source} AS TEXT) = '' THEN NULL \
             WHEN CAST({source} AS TEXT) IN ('{BOOLEAN_TRUE_CODE}', 'true') THEN '{BOOLEAN_TRUE_CODE}' \
             ELSE '{BOOLEAN_FALSE_CODE}' END"
        ),
        SqlType::Varchar(_) => format!("CAST({source} AS TEXT)"),
    }
}

impl SchemaDdl for SqliteDdl {
    fn list_columns(&self, conn: &Connection, table: &str) -> StoreResult<Vec<LiveColumn>> {
        catalog::list_columns(conn, table)
    }

    fn add_column(
        &self,
        conn: &Connection,
        table: &str,
        column: &str,
        sql_type: SqlType,
    ) -> StoreResult<()> {
        debug!(table, column, "ADD COLUMN");
        conn.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote(table),
            quote(column),
            sql_type.declaration()
        ))
        .map_err(step_err(column, "add column"))
    }

    fn copy_values(
        &self,
        conn: &Connection,
        table: &str,
        from: &str,
        to: &str,
        sql_type: SqlType,
    ) -> StoreResult<usize> {
        debug!(table, from, to, "Copy column values");
        let (source, target) = (quote(from), quote(to));
        conn.execute(
            &format!(
                "UPDATE {} SET {} = {}",
                quote(table),
                target,
                conversion(&source, sql_type)
            ),
            [],
        )
        .map_err(step_err(from, "copy values"))?;

        let lost: i64 = conn
            .query_row(
                &format!(
                    "SELECT COUNT(*) FROM {} WHERE {source} IS NOT NULL \
                     AND CAST({source} AS TEXT) <> '' AND {target} IS NULL",
                    quote(table)
                ),
                [],
                |row| row.get(0),
            )
            .map_err(step_err(from, "copy values"))?;
        Ok(usize::try_from(lost).unwrap_or_default())
    }

    fn drop_column(&self, conn: &Connection, table: &str, column: &str) -> StoreResult<()> {
        debug!(table, column, "DROP COLUMN");
        conn.execute_batch(&format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote(table),
            quote(column)
        ))
        .map_err(step_err(column, "drop column"))
    }

    fn rename_column(
        &self,
        conn: &Connection,
        table: &str,
        from: &str,
        to: &str,
    ) -> StoreResult<()> {
        debug!(table, from, to, "RENAME COLUMN");
        conn.execute_batch(&format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            quote(table),
            quote(from),
            quote(to)
        ))
        .map_err(step_err(from, "rename column"))
    }
}
