//! Live table metadata from SQLite's catalog.

use rusqlite::Connection;

use scout_core::StoreResult;

/// One live column as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    pub name: String,
    /// Declared type text exactly as written in the DDL that created it.
    pub declared_type: String,
}

/// Columns of `table` in table order. Empty when the table does not exist.
pub fn list_columns(conn: &Connection, table: &str) -> StoreResult<Vec<LiveColumn>> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(LiveColumn {
                name: row.get(0)?,
                declared_type: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
