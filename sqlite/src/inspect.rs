//! Read-only inspection of an existing SQLite database.
//!
//! These helpers run directly on the connection, outside the unit of work,
//! and are what the round-trip tests and the `rowbind` binary use to look
//! at tables created from a schema.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::{Result, SqliteError};

/// One column as reported by `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Zero-based column position.
    pub position: i64,
    pub name: String,
    /// Declared type, e.g. `CHAR(20)`.
    pub type_name: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// Lists user tables in name order.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Checks whether a table exists.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
    let count: i64 = stmt.query_row([table], |row| row.get(0))?;
    Ok(count > 0)
}

/// Reads column metadata for a table. Unknown tables yield an empty list.
pub fn table_info(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(
        "SELECT cid, name, type, \"notnull\", CAST(dflt_value AS TEXT), pk \
         FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                position: row.get(0)?,
                name: row.get(1)?,
                type_name: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                primary_key: row.get::<_, i64>(5)? > 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Counts every row of a table.
///
/// # Errors
///
/// Returns [`SqliteError::TableNotFound`] if the table does not exist.
pub fn row_count(conn: &Connection, table: &str) -> Result<u64> {
    if !table_exists(conn, table)? {
        return Err(SqliteError::TableNotFound(table.to_string()));
    }
    let quoted = table.replace('"', "\"\"");
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM \"{quoted}\""), [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(list_tables(&conn).unwrap().is_empty());
        assert!(!table_exists(&conn, "t").unwrap());
        assert!(table_info(&conn, "t").unwrap().is_empty());
        assert!(matches!(
            row_count(&conn, "t"),
            Err(SqliteError::TableNotFound(ref name)) if name == "t"
        ));
    }

    #[test]
    fn test_table_info() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a INT NOT NULL, b CHAR(4) NULL DEFAULT 'x', PRIMARY KEY(a));
             INSERT INTO t (a) VALUES (1);",
        )
        .unwrap();

        assert_eq!(list_tables(&conn).unwrap(), vec!["t".to_string()]);
        let info = table_info(&conn, "t").unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].type_name, "INT");
        assert!(info[0].not_null && info[0].primary_key);
        assert_eq!(info[1].type_name, "CHAR(4)");
        assert_eq!(info[1].default_value.as_deref(), Some("'x'"));
        assert!(!info[1].primary_key);
        assert_eq!(row_count(&conn, "t").unwrap(), 1);
    }
}
