//! Orphan-table cleanup and database health checks.

use rusqlite::Connection;

use tabula_core::errors::TabulaResult;

use super::table_ops;
use crate::to_storage_err;

/// Drop backing tables that no mapping row references (left behind when a
/// sheet disappears from its source file). Returns the number dropped.
pub fn cleanup_orphan_tables(conn: &Connection) -> TabulaResult<usize> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name GLOB 'table_*'")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut backing_tables = Vec::new();
    for row in rows {
        backing_tables.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }

    let mut stmt = conn
        .prepare("SELECT DISTINCT table_name FROM table_mappings")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut mapped = std::collections::HashSet::new();
    for row in rows {
        mapped.insert(row.map_err(|e| to_storage_err(e.to_string()))?);
    }

    let mut dropped = 0;
    for table in backing_tables {
        if !mapped.contains(&table) {
            table_ops::drop_table(conn, &table)?;
            dropped += 1;
        }
    }
    Ok(dropped)
}

/// Run SQLite's integrity check.
pub fn integrity_check(conn: &Connection) -> TabulaResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result.eq_ignore_ascii_case("ok"))
}
