//! v001: file_versions, table_mappings, enhanced_table_mappings.

use rusqlite::Connection;

use tabula_core::errors::TabulaResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TabulaResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS file_versions (
            file_name    TEXT PRIMARY KEY,
            file_hash    TEXT NOT NULL,
            last_updated TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            table_count  INTEGER NOT NULL DEFAULT 0,
            status       TEXT NOT NULL DEFAULT 'active'
        );

        CREATE TABLE IF NOT EXISTS table_mappings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name   TEXT NOT NULL,
            sheet_name  TEXT NOT NULL,
            table_name  TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (file_name, sheet_name)
        );

        CREATE INDEX IF NOT EXISTS idx_mappings_file ON table_mappings(file_name);

        CREATE TABLE IF NOT EXISTS enhanced_table_mappings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name   TEXT NOT NULL,
            sheet_name  TEXT NOT NULL,
            table_name  TEXT NOT NULL,
            file_path   TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (file_name, sheet_name)
        );

        CREATE INDEX IF NOT EXISTS idx_enhanced_file ON enhanced_table_mappings(file_name);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
