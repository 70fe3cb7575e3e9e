//! SQLite PRAGMA configuration.
//! Must be called on every connection immediately after opening.

use rusqlite::Connection;

use scout_core::StoreResult;

/// Configure a connection for record and schema work.
/// - WAL so ad hoc readers do not block ingestion
/// - busy_timeout as the only wait on lock contention
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u32) -> StoreResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
        ",
    )?;
    conn.busy_timeout(std::time::Duration::from_millis(u64::from(busy_timeout_ms)))?;
    Ok(())
}
