//! Backing-table lifecycle: drop, create from parsed sheet rows.

use rusqlite::{Connection, ToSql};

use tabula_core::errors::TabulaResult;
use tabula_core::models::{CellScalar, SheetData};

use crate::to_storage_err;

/// Drop a backing table if it exists.
pub fn drop_table(conn: &Connection, table_name: &str) -> TabulaResult<()> {
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS {}",
        quote_ident(table_name)
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Create a backing table from a parsed sheet and insert every row, all in
/// one transaction.
///
/// Column labels are deduplicated and never empty; column types use the
/// narrowest SQLite affinity the data allows.
pub fn create_table_from_sheet(
    conn: &Connection,
    table_name: &str,
    sheet: &SheetData,
) -> TabulaResult<()> {
    // An empty sheet still gets a backing table so the mapping invariant
    // (one live table per sheet) holds.
    let columns = if sheet.columns.is_empty() {
        vec!["column_1".to_string()]
    } else {
        column_labels(&sheet.columns)
    };
    let affinities: Vec<&str> = (0..columns.len())
        .map(|idx| column_affinity(&sheet.rows, idx))
        .collect();

    let column_defs = columns
        .iter()
        .zip(&affinities)
        .map(|(name, affinity)| format!("{} {affinity}", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("create table begin: {e}")))?;

    tx.execute_batch(&format!(
        "CREATE TABLE {} ({column_defs})",
        quote_ident(table_name)
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;

    if !sheet.rows.is_empty() {
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} VALUES ({placeholders})",
            quote_ident(table_name)
        );
        let mut stmt = tx
            .prepare(&insert_sql)
            .map_err(|e| to_storage_err(e.to_string()))?;

        for row in &sheet.rows {
            let values: Vec<rusqlite::types::Value> = (0..columns.len())
                .map(|idx| bind_value(row.get(idx).unwrap_or(&CellScalar::Null)))
                .collect();
            let params: Vec<&dyn ToSql> =
                values.iter().map(|v| v as &dyn ToSql).collect();
            stmt.execute(params.as_slice())
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("create table commit: {e}")))?;
    Ok(())
}

/// Ordered column names of an existing table.
pub fn table_columns(conn: &Connection, table_name: &str) -> TabulaResult<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", quote_ident(table_name)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(columns)
}

/// Quote an identifier for embedding in SQL text. Table names are already
/// sanitized to alphanumerics; quoting also covers raw column labels from
/// the header row.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Make header labels usable as column names: trimmed, never empty,
/// deduplicated with positional suffixes.
fn column_labels(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(idx, label)| {
            let trimmed = label.trim();
            let base = if trimmed.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                trimmed.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0usize);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base}_{count}")
            }
        })
        .collect()
}

/// The narrowest SQLite affinity that fits every non-null cell of a column.
fn column_affinity(rows: &[Vec<CellScalar>], idx: usize) -> &'static str {
    let mut has_value = false;
    let mut all_int = true;
    let mut all_numeric = true;
    for row in rows {
        match row.get(idx) {
            None | Some(CellScalar::Null) => {}
            Some(CellScalar::Int(_)) | Some(CellScalar::Bool(_)) => {
                has_value = true;
            }
            Some(CellScalar::Float(_)) => {
                has_value = true;
                all_int = false;
            }
            Some(CellScalar::Text(_)) => {
                has_value = true;
                all_int = false;
                all_numeric = false;
            }
        }
    }
    if !has_value {
        "TEXT"
    } else if all_int {
        "INTEGER"
    } else if all_numeric {
        "REAL"
    } else {
        "TEXT"
    }
}

fn bind_value(cell: &CellScalar) -> rusqlite::types::Value {
    match cell {
        CellScalar::Null => rusqlite::types::Value::Null,
        CellScalar::Int(i) => rusqlite::types::Value::Integer(*i),
        CellScalar::Float(f) => rusqlite::types::Value::Real(*f),
        CellScalar::Bool(b) => rusqlite::types::Value::Integer(*b as i64),
        CellScalar::Text(s) => rusqlite::types::Value::Text(s.clone()),
    }
}
