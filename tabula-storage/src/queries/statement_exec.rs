//! Sequential execution of a semicolon-separated statement batch.
//!
//! One statement's failure never aborts the batch: it is recorded in that
//! statement's result and execution continues. Statements share one
//! connection and observe each other's effects in issued order.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{Map, Number, Value};
use tracing::debug;

use tabula_core::constants::STATEMENT_SEPARATOR;
use tabula_core::models::StatementResult;

/// Execute every statement of the batch in order. An empty or
/// whitespace-only batch yields an empty vec — "no query to run", not an
/// error.
pub fn execute_batch(conn: &Connection, batch_text: &str) -> Vec<StatementResult> {
    let statements: Vec<&str> = batch_text
        .split(STATEMENT_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    statements
        .iter()
        .enumerate()
        .map(|(index, text)| run_statement(conn, index, text))
        .collect()
}

fn run_statement(conn: &Connection, index: usize, text: &str) -> StatementResult {
    match query_statement(conn, text) {
        Ok((columns, rows)) => {
            debug!(index, rows = rows.len(), "statement succeeded");
            StatementResult::success(index, text.to_string(), columns, rows)
        }
        Err(e) => {
            debug!(index, error = %e, "statement failed, continuing batch");
            StatementResult::failure(index, text.to_string(), e.to_string())
        }
    }
}

fn query_statement(
    conn: &Connection,
    text: &str,
) -> rusqlite::Result<(Vec<String>, Vec<Map<String, Value>>)> {
    let mut stmt = conn.prepare(text)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = Map::new();
        for (i, column) in columns.iter().enumerate() {
            map.insert(column.clone(), json_value(row.get_ref(i)?));
        }
        out.push(map);
    }
    Ok((columns, out))
}

/// Convert one SQLite cell to JSON. SQL NULL stays an explicit JSON null;
/// BLOBs surface as lowercase hex.
fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(to_hex(b)),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_statement_is_isolated() {
        let conn = Connection::open_in_memory().unwrap();
        let results =
            execute_batch(&conn, "SELECT 1; SELECT * FROM missing_table; SELECT 2");

        assert_eq!(results.len(), 3);

        assert!(results[0].error.is_none());
        assert_eq!(results[0].index, 0);
        assert_eq!(results[0].rows.len(), 1);

        assert!(results[1].error.as_deref().unwrap().contains("missing_table"));
        assert!(results[1].columns.is_empty());
        assert!(results[1].rows.is_empty());

        assert!(results[2].error.is_none());
        assert_eq!(results[2].index, 2);
        assert_eq!(results[2].rows.len(), 1);
    }

    #[test]
    fn empty_batch_is_not_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(execute_batch(&conn, "").is_empty());
        assert!(execute_batch(&conn, " ;  ; \n;").is_empty());
    }

    #[test]
    fn null_is_preserved_and_types_are_native() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (name TEXT, qty INTEGER, price REAL);
             INSERT INTO t VALUES ('bolt', NULL, 0.5);",
        )
        .unwrap();

        let results = execute_batch(&conn, "SELECT name, qty, price FROM t");
        assert_eq!(results.len(), 1);
        let row = &results[0].rows[0];
        assert_eq!(row.get("name"), Some(&Value::String("bolt".to_string())));
        assert_eq!(row.get("qty"), Some(&Value::Null));
        assert_eq!(row.get("price"), Some(&Value::Number(Number::from_f64(0.5).unwrap())));
        assert_eq!(results[0].columns, vec!["name", "qty", "price"]);
    }

    #[test]
    fn statements_observe_earlier_ddl_in_the_batch() {
        let conn = Connection::open_in_memory().unwrap();
        let results = execute_batch(
            &conn,
            "CREATE TABLE later (v INTEGER); INSERT INTO later VALUES (7); SELECT v FROM later",
        );
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.error.is_none()));
        assert_eq!(
            results[2].rows[0].get("v"),
            Some(&Value::Number(7.into()))
        );
    }

    #[test]
    fn results_keep_original_statement_order() {
        let conn = Connection::open_in_memory().unwrap();
        let results = execute_batch(&conn, "SELECT 1 AS a; SELECT 2 AS b; SELECT 3 AS c");
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let texts: Vec<&str> = results.iter().map(|r| r.statement_text.as_str()).collect();
        assert_eq!(texts, vec!["SELECT 1 AS a", "SELECT 2 AS b", "SELECT 3 AS c"]);
    }

    #[test]
    fn blob_cells_surface_as_hex() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE b (data BLOB); INSERT INTO b VALUES (x'DEADBEEF');")
            .unwrap();
        let results = execute_batch(&conn, "SELECT data FROM b");
        assert_eq!(
            results[0].rows[0].get("data"),
            Some(&Value::String("deadbeef".to_string()))
        );
    }
}
