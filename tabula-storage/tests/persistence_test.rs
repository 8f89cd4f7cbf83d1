//! Restart survival: mappings, registry, and the fast path all hold across
//! engine close + reopen cycles.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tabula_core::errors::{SyncError, TabulaResult};
use tabula_core::models::{CellScalar, SheetData};
use tabula_core::traits::ISheetReader;
use tabula_storage::SyncEngine;

#[derive(Default)]
struct ScriptedReader {
    sheets: Mutex<HashMap<String, Vec<SheetData>>>,
}

impl ScriptedReader {
    fn set_sheets(&self, file_name: &str, sheets: Vec<SheetData>) {
        self.sheets
            .lock()
            .unwrap()
            .insert(file_name.to_string(), sheets);
    }
}

impl ISheetReader for ScriptedReader {
    fn sheet_names(&self, path: &Path) -> TabulaResult<Vec<String>> {
        let file_name = path.file_name().unwrap().to_str().unwrap();
        let sheets = self.sheets.lock().unwrap();
        sheets
            .get(file_name)
            .map(|list| list.iter().map(|s| s.name.clone()).collect())
            .ok_or_else(|| {
                SyncError::FileAccess {
                    path: path.display().to_string(),
                    reason: "not scripted".to_string(),
                }
                .into()
            })
    }

    fn read_sheet(&self, path: &Path, sheet_name: &str) -> TabulaResult<SheetData> {
        let file_name = path.file_name().unwrap().to_str().unwrap();
        let sheets = self.sheets.lock().unwrap();
        sheets
            .get(file_name)
            .and_then(|list| list.iter().find(|s| s.name == sheet_name))
            .cloned()
            .ok_or_else(|| {
                SyncError::SheetParse {
                    sheet: sheet_name.to_string(),
                    reason: "unknown sheet".to_string(),
                }
                .into()
            })
    }
}

fn inventory_sheet() -> SheetData {
    SheetData {
        name: "Inventory".to_string(),
        columns: vec!["part".to_string(), "count".to_string()],
        rows: vec![vec![
            CellScalar::Text("gear".to_string()),
            CellScalar::Int(4),
        ]],
    }
}

#[test]
fn mappings_and_registry_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tabula.db");
    let registry_path = dir.path().join("file_registry.json");
    let source = dir.path().join("stock.xlsx");
    std::fs::write(&source, b"stock v1").unwrap();

    let reader = Arc::new(ScriptedReader::default());
    reader.set_sheets("stock.xlsx", vec![inventory_sheet()]);

    // Session 1: initial sync.
    {
        let engine = SyncEngine::open(
            &db_path,
            &registry_path,
            Arc::clone(&reader) as Arc<dyn ISheetReader>,
        )
        .unwrap();
        let outcome = engine.sync(&source).unwrap();
        assert!(outcome.changed);
        // Engine drops here, connections close.
    }

    // Session 2: registry reload makes the unchanged file a fast path, and
    // the mappings read back from the database.
    {
        let engine = SyncEngine::open(
            &db_path,
            &registry_path,
            Arc::clone(&reader) as Arc<dyn ISheetReader>,
        )
        .unwrap();
        let outcome = engine.sync(&source).unwrap();
        assert!(!outcome.changed, "registry must survive restart");
        assert_eq!(outcome.mappings.len(), 1);
        assert_eq!(outcome.mappings[0].table_name, "table_stock_Inventory");

        let results = engine
            .execute_batch("SELECT part FROM table_stock_Inventory")
            .unwrap();
        assert_eq!(
            results[0].rows[0].get("part"),
            Some(&serde_json::Value::String("gear".to_string()))
        );
    }
}

#[test]
fn wal_mode_is_active_on_the_writer() {
    let dir = tempfile::tempdir().unwrap();
    let reader = Arc::new(ScriptedReader::default());
    let engine = SyncEngine::open(
        &dir.path().join("tabula.db"),
        &dir.path().join("file_registry.json"),
        reader as Arc<dyn ISheetReader>,
    )
    .unwrap();

    let ok = engine
        .pool()
        .writer
        .with_conn_sync(tabula_storage::pool::pragmas::verify_wal_mode)
        .unwrap();
    assert!(ok, "WAL mode must be active on the file-backed writer");
}

#[test]
fn table_names_are_identical_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tabula.db");
    let registry_path = dir.path().join("file_registry.json");
    let source = dir.path().join("stock.xlsx");

    let reader = Arc::new(ScriptedReader::default());
    reader.set_sheets("stock.xlsx", vec![inventory_sheet()]);

    let mut names = Vec::new();
    for cycle in 0..3 {
        // New bytes each cycle force a resync; the generated name must not
        // depend on process state or time.
        std::fs::write(&source, format!("stock v{cycle}")).unwrap();
        let engine = SyncEngine::open(
            &db_path,
            &registry_path,
            Arc::clone(&reader) as Arc<dyn ISheetReader>,
        )
        .unwrap();
        let outcome = engine.sync(&source).unwrap();
        names.push(outcome.mappings[0].table_name.clone());
    }
    assert!(names.iter().all(|n| n == "table_stock_Inventory"));
}
