//! Record CRUD and reporting queries, one short-lived connection per call.
//!
//! Writes decode and coerce the whole record before touching the database,
//! then execute a single statement. Nothing here retries.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use tracing::{debug, warn};

use scout_core::constants::{DELETED_COLUMN, ID_COLUMN};
use scout_core::{GameConfig, StoreResult};

use crate::codec::{
    coerce_flag_for_read, coerce_for_read, decode_wire_record, encode_record, encode_update_row,
};
use crate::connection::Database;
use crate::lock::LockMode;

/// Ids bound per soft-delete statement.
const SOFT_DELETE_CHUNK: usize = 500;

/// Result of an ad hoc query: column names plus natively typed cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TabularResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header row first, then the data rows.
    pub fn into_grid(self) -> Vec<Vec<Value>> {
        let header = self.columns.into_iter().map(Value::Text).collect();
        std::iter::once(header).chain(self.rows).collect()
    }
}

/// Query surface over one store and the schema it is synchronized to.
pub struct QueryGateway<'a> {
    db: &'a Database,
    schema: &'a GameConfig,
}

impl<'a> QueryGateway<'a> {
    pub fn new(db: &'a Database, schema: &'a GameConfig) -> Self {
        Self { db, schema }
    }

    /// Insert one tab-delimited record. Returns the new row id.
    pub fn insert_record(&self, payload: &str) -> StoreResult<i64> {
        let record = decode_wire_record(payload, self.schema)?;
        let values = encode_record(&record, self.schema)?;
        let statement = self.db.statements().insert(self.schema);

        self.db.locked(LockMode::Shared, "insert_record", || {
            let conn = self.db.connect()?;
            conn.execute(&statement.sql, params_from_iter(values.iter()))?;
            let id = conn.last_insert_rowid();
            debug!(id, "Record inserted");
            Ok(id)
        })
    }

    /// Rewrite one record from its edit-view row (id, delete flag, fields).
    /// Returns the number of rows changed, zero for an unknown id.
    pub fn update_record(&self, row: &[String]) -> StoreResult<usize> {
        let values = encode_update_row(row, self.schema)?;
        let statement = self.db.statements().update(self.schema);

        self.db.locked(LockMode::Shared, "update_record", || {
            let conn = self.db.connect()?;
            let changed = conn.execute(&statement.sql, params_from_iter(values.iter()))?;
            debug!(changed, "Record updated");
            Ok(changed)
        })
    }

    /// Flag rows deleted in one transaction. Rows are never physically removed.
    pub fn soft_delete(&self, ids: &[i64]) -> StoreResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let builder = self.db.statements();

        self.db.locked(LockMode::Shared, "soft_delete", || {
            let mut conn = self.db.connect()?;
            let tx = conn.transaction()?;
            let mut changed = 0;
            for chunk in ids.chunks(SOFT_DELETE_CHUNK) {
                changed += tx.execute(&builder.soft_delete(chunk.len()), params_from_iter(chunk))?;
            }
            tx.commit()?;
            debug!(requested = ids.len(), changed, "Records soft-deleted");
            Ok(changed)
        })
    }

    /// Non-deleted rows as display strings, header row first.
    pub fn list_active_records(&self) -> StoreResult<Vec<Vec<String>>> {
        self.edit_view(&self.db.statements().select_active(self.schema))
    }

    /// Every row including soft-deleted ones, header row first.
    pub fn list_all_records(&self) -> StoreResult<Vec<Vec<String>>> {
        self.edit_view(&self.db.statements().select_all(self.schema))
    }

    /// Non-deleted rows for export. Headers are field titles; columns with
    /// no owning field keep their raw names.
    pub fn export_active_records(&self) -> StoreResult<Vec<Vec<String>>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&self.db.statements().export_select(self.schema))?;

        let header: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| match self.schema.field_for_column(name) {
                Some(field) if !field.title.is_empty() => field.title.clone(),
                _ => name.to_string(),
            })
            .collect();

        let mut grid = vec![header];
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            if self.schema.field_count() == 0 {
                grid.push(vec![display_id(row)?]);
                continue;
            }
            let cells = self
                .schema
                .fields()
                .enumerate()
                .map(|(i, field)| Ok(coerce_for_read(row.get_ref(i)?, field.field_type)))
                .collect::<StoreResult<Vec<String>>>()?;
            grid.push(cells);
        }
        Ok(grid)
    }

    pub fn count_active_records(&self) -> StoreResult<i64> {
        let conn = self.db.connect()?;
        let count = conn.query_row(&self.db.statements().count_active(), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Run caller-supplied SQL on a connection pinned read-only for the call.
    ///
    /// Any statement that would write fails inside SQLite. Results carry no
    /// row cap.
    pub fn run_read_only_query(&self, sql: &str) -> StoreResult<TabularResult> {
        let conn = self.db.connect()?;
        let _read_only = QueryOnlyGuard::pin(&conn)?;

        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let cells = (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<Value>>>()?;
            rows.push(cells);
        }
        debug!(rows = rows.len(), columns = width, "Read-only query finished");
        Ok(TabularResult { columns, rows })
    }

    fn edit_view(&self, sql: &str) -> StoreResult<Vec<Vec<String>>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(sql)?;

        let mut header = vec![ID_COLUMN.to_string(), DELETED_COLUMN.to_string()];
        header.extend(self.schema.columns());

        let mut grid = vec![header];
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(self.schema.field_count() + 2);
            cells.push(display_id(row)?);
            cells.push(coerce_flag_for_read(row.get_ref(1)?));
            for (i, field) in self.schema.fields().enumerate() {
                cells.push(coerce_for_read(row.get_ref(i + 2)?, field.field_type));
            }
            grid.push(cells);
        }
        Ok(grid)
    }
}

fn display_id(row: &Row<'_>) -> StoreResult<String> {
    Ok(row.get::<_, i64>(0)?.to_string())
}

/// Holds `PRAGMA query_only` on for its lifetime.
struct QueryOnlyGuard<'c> {
    conn: &'c Connection,
}

impl<'c> QueryOnlyGuard<'c> {
    fn pin(conn: &'c Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "query_only", true)?;
        Ok(Self { conn })
    }
}

impl Drop for QueryOnlyGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.pragma_update(None, "query_only", false) {
            warn!(error = %e, "Failed to restore query_only");
        }
    }
}
