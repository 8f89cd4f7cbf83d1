//! Reads and writes for the mapping and file-version tables.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use tabula_core::errors::TabulaResult;
use tabula_core::models::{EnhancedMapping, SheetTableMapping};

use crate::to_storage_err;

/// Remove every mapping row for a file, in both mapping tables. Called at
/// the start of a resync so sheets that disappeared from the file do not
/// leave stale rows behind.
pub fn clear_file_mappings(conn: &Connection, file_name: &str) -> TabulaResult<()> {
    conn.execute(
        "DELETE FROM table_mappings WHERE file_name = ?1",
        params![file_name],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "DELETE FROM enhanced_table_mappings WHERE file_name = ?1",
        params![file_name],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Upsert one sheet→table mapping row.
pub fn upsert_mapping(conn: &Connection, mapping: &SheetTableMapping) -> TabulaResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO table_mappings (file_name, sheet_name, table_name, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            mapping.source_file_name,
            mapping.sheet_name,
            mapping.table_name,
            mapping.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Upsert one enhanced mapping row (carries the originating file path).
pub fn upsert_enhanced(conn: &Connection, mapping: &EnhancedMapping) -> TabulaResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO enhanced_table_mappings
             (file_name, sheet_name, table_name, file_path)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            mapping.source_file_name,
            mapping.sheet_name,
            mapping.table_name,
            mapping.file_path,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// All mappings recorded for one file, ordered by sheet name.
pub fn mappings_for_file(
    conn: &Connection,
    file_name: &str,
) -> TabulaResult<Vec<SheetTableMapping>> {
    let mut stmt = conn
        .prepare(
            "SELECT file_name, sheet_name, table_name, created_at
             FROM table_mappings
             WHERE file_name = ?1
             ORDER BY sheet_name",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![file_name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut mappings = Vec::new();
    for row in rows {
        let (source_file_name, sheet_name, table_name, created_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        mappings.push(SheetTableMapping {
            source_file_name,
            sheet_name,
            table_name,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(mappings)
}

/// Enhanced mappings, optionally filtered to one file.
pub fn enhanced_mappings(
    conn: &Connection,
    file_name: Option<&str>,
) -> TabulaResult<Vec<EnhancedMapping>> {
    let (sql, filter) = match file_name {
        Some(name) => (
            "SELECT file_name, sheet_name, table_name, file_path
             FROM enhanced_table_mappings
             WHERE file_name = ?1
             ORDER BY file_name, sheet_name",
            vec![name.to_string()],
        ),
        None => (
            "SELECT file_name, sheet_name, table_name, file_path
             FROM enhanced_table_mappings
             ORDER BY file_name, sheet_name",
            Vec::new(),
        ),
    };

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(filter.iter()), |row| {
            Ok(EnhancedMapping {
                source_file_name: row.get(0)?,
                sheet_name: row.get(1)?,
                table_name: row.get(2)?,
                file_path: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut mappings = Vec::new();
    for row in rows {
        mappings.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(mappings)
}

/// The backing table for one `(file, sheet)` pair, via the enhanced index.
pub fn table_for_sheet(
    conn: &Connection,
    file_name: &str,
    sheet_name: &str,
) -> TabulaResult<Option<String>> {
    conn.query_row(
        "SELECT table_name FROM enhanced_table_mappings
         WHERE file_name = ?1 AND sheet_name = ?2",
        params![file_name, sheet_name],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Record a file's fully-synced version.
pub fn record_file_version(
    conn: &Connection,
    file_name: &str,
    file_hash: &str,
    table_count: usize,
) -> TabulaResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO file_versions
             (file_name, file_hash, last_updated, table_count, status)
         VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), ?3, 'active')",
        params![file_name, file_hash, table_count as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Files currently marked active in `file_versions`.
pub fn active_file_count(conn: &Connection) -> TabulaResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM file_versions WHERE status = 'active'",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Total mapping rows.
pub fn mapping_count(conn: &Connection) -> TabulaResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM table_mappings", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}

fn parse_timestamp(raw: &str) -> TabulaResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp '{raw}': {e}")))
}
