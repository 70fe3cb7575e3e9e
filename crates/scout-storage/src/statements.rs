//! SQL text generation from the schema model.
//!
//! Pure string building: nothing here touches a connection. Every identifier
//! is quoted, and every column name comes from `scout_core::normalize`.
//! Parameter order always follows the canonical field order.

use scout_core::constants::{DELETED_COLUMN, ID_COLUMN};
use scout_core::{quote, FieldSpec, GameConfig, SqlType, StorageConfig};

/// SQL text plus the order its positional parameters bind in.
///
/// `params` holds field codes; the row key appears as `ID_COLUMN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Vec<String>,
}

/// Builds statements for one table.
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    table: String,
    varchar_length: u32,
}

impl StatementBuilder {
    pub fn new(table: impl Into<String>, varchar_length: u32) -> Self {
        Self {
            table: table.into(),
            varchar_length,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.effective_table_name(), config.effective_varchar_length())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column type a field is stored as under this builder's settings.
    pub fn sql_type(&self, field: &FieldSpec) -> SqlType {
        field.sql_type(self.varchar_length)
    }

    /// `CREATE TABLE` for initial bootstrap: key, delete flag, then one
    /// column per field in canonical order.
    pub fn create_table(&self, schema: &GameConfig) -> String {
        let mut columns = vec![
            format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quote(ID_COLUMN)),
            format!("{} BOOLEAN NOT NULL DEFAULT FALSE", quote(DELETED_COLUMN)),
        ];
        columns.extend(schema.fields().map(|field| {
            format!("{} {}", quote(&field.column()), self.sql_type(field).declaration())
        }));
        format!("CREATE TABLE {} ({})", quote(&self.table), columns.join(", "))
    }

    /// `INSERT` binding every field in canonical order.
    pub fn insert(&self, schema: &GameConfig) -> BuiltStatement {
        let params = field_codes(schema);
        let sql = if params.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote(&self.table))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote(&self.table),
                quoted_columns(schema).join(", "),
                placeholders(1, params.len())
            )
        };
        BuiltStatement { sql, params }
    }

    /// `UPDATE` keyed by row id. Fields bind in canonical order, the id last.
    pub fn update(&self, schema: &GameConfig) -> BuiltStatement {
        let mut params = field_codes(schema);
        let assignments: Vec<String> = if params.is_empty() {
            vec![format!("{0} = {0}", quote(DELETED_COLUMN))]
        } else {
            quoted_columns(schema)
                .into_iter()
                .enumerate()
                .map(|(i, column)| format!("{} = ?{}", column, i + 1))
                .collect()
        };
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote(&self.table),
            assignments.join(", "),
            quote(ID_COLUMN),
            params.len() + 1
        );
        params.push(ID_COLUMN.to_string());
        BuiltStatement { sql, params }
    }

    /// Full-table projection for edit views: id, delete flag, then fields.
    /// Includes soft-deleted rows.
    pub fn select_all(&self, schema: &GameConfig) -> String {
        let mut columns = vec![quote(ID_COLUMN), quote(DELETED_COLUMN)];
        columns.extend(quoted_columns(schema));
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns.join(", "),
            quote(&self.table),
            quote(ID_COLUMN)
        )
    }

    /// Same projection as [`select_all`](Self::select_all), non-deleted rows only.
    pub fn select_active(&self, schema: &GameConfig) -> String {
        let mut columns = vec![quote(ID_COLUMN), quote(DELETED_COLUMN)];
        columns.extend(quoted_columns(schema));
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {}",
            columns.join(", "),
            quote(&self.table),
            active_filter(),
            quote(ID_COLUMN)
        )
    }

    /// Export projection: canonical fields only, non-deleted rows only.
    pub fn export_select(&self, schema: &GameConfig) -> String {
        let columns = quoted_columns(schema);
        let projection = if columns.is_empty() {
            // SQLite rejects an empty projection; keep the row count visible.
            quote(ID_COLUMN)
        } else {
            columns.join(", ")
        };
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {}",
            projection,
            quote(&self.table),
            active_filter(),
            quote(ID_COLUMN)
        )
    }

    /// Batch soft delete of `count` ids bound as `?1..?count`.
    pub fn soft_delete(&self, count: usize) -> String {
        format!(
            "UPDATE {} SET {} = TRUE WHERE {} IN ({})",
            quote(&self.table),
            quote(DELETED_COLUMN),
            quote(ID_COLUMN),
            placeholders(1, count)
        )
    }

    /// Row count of non-deleted records.
    pub fn count_active(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote(&self.table),
            active_filter()
        )
    }
}

fn field_codes(schema: &GameConfig) -> Vec<String> {
    schema.fields().map(|f| f.code.clone()).collect()
}

fn quoted_columns(schema: &GameConfig) -> Vec<String> {
    schema.fields().map(|f| quote(&f.column())).collect()
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn active_filter() -> String {
    format!("{} = FALSE", quote(DELETED_COLUMN))
}
