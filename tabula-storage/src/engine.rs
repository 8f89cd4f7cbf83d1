//! SyncEngine — owns the connection pool, the digest registry, and the
//! per-path locks; decides reuse vs resync for every source file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use tabula_core::errors::{StorageError, TabulaError, TabulaResult};
use tabula_core::models::{
    DatabaseInfo, EnhancedMapping, SheetTableMapping, SourceFile, StatementResult,
};
use tabula_core::traits::ISheetReader;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{maintenance, mapping_ops, statement_exec, table_ops};
use crate::registry::FileRegistry;

/// Result of syncing one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// False only on the fast path: digest matched, nothing was touched.
    pub changed: bool,
    pub mappings: Vec<SheetTableMapping>,
    /// Sheets skipped by per-sheet failure isolation. Non-empty means the
    /// registry digest was NOT advanced and the next sync retries the file.
    pub failed_sheets: Vec<String>,
}

/// The incremental sync engine. Converts source-file sheets into backing
/// tables and keeps the sheet→table mappings, the digest registry, and the
/// tables themselves mutually consistent.
pub struct SyncEngine {
    pool: ConnectionPool,
    registry: Mutex<FileRegistry>,
    reader: Arc<dyn ISheetReader>,
    /// Per-path sync locks: concurrent syncs of one path would race on
    /// digest-check-then-write.
    path_locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl SyncEngine {
    /// Open the engine over a database file and a digest-registry file.
    pub fn open(
        db_path: &Path,
        registry_path: &Path,
        reader: Arc<dyn ISheetReader>,
    ) -> TabulaResult<Self> {
        let pool = ConnectionPool::open(db_path, crate::pool::ReadPool::default_size())?;
        pool.writer.with_conn_sync(migrations::run_migrations)?;
        let registry = Mutex::new(FileRegistry::load(registry_path));
        info!(db = %db_path.display(), "sync engine opened");
        Ok(Self {
            pool,
            registry,
            reader,
            path_locks: DashMap::new(),
        })
    }

    /// Bring one source file's tables up to date.
    ///
    /// Fast path: if the stored digest matches the file's current digest,
    /// the previously recorded mappings are returned untouched — no table
    /// is dropped or recreated. Otherwise every sheet is re-materialized;
    /// per-sheet failures are isolated and reported in the outcome, and the
    /// digest only advances when all sheets succeeded.
    pub fn sync(&self, path: &Path) -> TabulaResult<SyncOutcome> {
        let lock = self.path_lock(path);
        let _guard = lock.lock().map_err(|e| poisoned(&e.to_string()))?;

        let mut source = SourceFile::inspect(path)?;
        source.last_synced_hash = self
            .lock_registry()?
            .stored_hash(&source.file_name)
            .map(str::to_string);

        if source.is_unchanged() {
            debug!(file = %source.file_name, "digest unchanged, reusing mappings");
            let mappings = self.mappings_for_file(&source.file_name)?;
            return Ok(SyncOutcome {
                changed: false,
                mappings,
                failed_sheets: Vec::new(),
            });
        }

        info!(file = %source.file_name, "source file changed, resyncing");
        let sheet_names = self.reader.sheet_names(path)?;

        // Stale rows for sheets that disappeared must not survive the resync.
        self.pool
            .writer
            .with_conn_sync(|conn| mapping_ops::clear_file_mappings(conn, &source.file_name))?;

        let mut mappings = Vec::new();
        let mut failed_sheets = Vec::new();

        for sheet_name in &sheet_names {
            let sheet = match self.reader.read_sheet(path, sheet_name) {
                Ok(sheet) => sheet,
                Err(e) => {
                    warn!(
                        file = %source.file_name,
                        sheet = %sheet_name,
                        error = %e,
                        "skipping unparseable sheet"
                    );
                    failed_sheets.push(sheet_name.clone());
                    continue;
                }
            };

            let table_name = SheetTableMapping::table_name_for(&source.base_name, sheet_name);
            let created = self.pool.writer.with_conn_sync(|conn| {
                table_ops::drop_table(conn, &table_name)?;
                table_ops::create_table_from_sheet(conn, &table_name, &sheet)
            });
            if let Err(e) = created {
                warn!(
                    file = %source.file_name,
                    sheet = %sheet_name,
                    error = %e,
                    "failed to materialize sheet table"
                );
                failed_sheets.push(sheet_name.clone());
                continue;
            }

            // Mapping rows must not silently diverge from the tables they
            // describe: write failures propagate.
            let mapping = SheetTableMapping {
                source_file_name: source.file_name.clone(),
                sheet_name: sheet_name.clone(),
                table_name: table_name.clone(),
                created_at: Utc::now(),
            };
            let enhanced = EnhancedMapping {
                source_file_name: source.file_name.clone(),
                sheet_name: sheet_name.clone(),
                table_name,
                file_path: path.display().to_string(),
            };
            self.pool.writer.with_conn_sync(|conn| {
                mapping_ops::upsert_mapping(conn, &mapping)?;
                mapping_ops::upsert_enhanced(conn, &enhanced)
            })?;
            mappings.push(mapping);
        }

        if failed_sheets.is_empty() {
            self.lock_registry()?
                .record(&source.file_name, &source.content_hash)?;
            self.pool.writer.with_conn_sync(|conn| {
                mapping_ops::record_file_version(
                    conn,
                    &source.file_name,
                    &source.content_hash,
                    mappings.len(),
                )
            })?;
            info!(
                file = %source.file_name,
                sheets = mappings.len(),
                "resync complete"
            );
        } else {
            warn!(
                file = %source.file_name,
                failed = failed_sheets.len(),
                "partial sync, digest not advanced; next sync retries the file"
            );
        }

        Ok(SyncOutcome {
            changed: true,
            mappings,
            failed_sheets,
        })
    }

    /// Sync every spreadsheet in a directory. One file's failure is logged
    /// and skipped; the remaining files still sync.
    pub fn check_all(
        &self,
        dir: &Path,
    ) -> TabulaResult<BTreeMap<String, Vec<SheetTableMapping>>> {
        let mut all = BTreeMap::new();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "source directory missing, nothing to sync");
            return Ok(all);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| {
                TabulaError::Sync(tabula_core::errors::SyncError::FileAccess {
                    path: dir.display().to_string(),
                    reason: e.to_string(),
                })
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| SourceFile::is_spreadsheet(path))
            .collect();
        files.sort();

        for path in files {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            match self.sync(&path) {
                Ok(outcome) => {
                    all.insert(file_name, outcome.mappings);
                }
                Err(e) => {
                    warn!(
                        file = %file_name,
                        error = %e,
                        "sync failed, continuing with remaining files"
                    );
                }
            }
        }
        Ok(all)
    }

    /// Mappings recorded for one file.
    pub fn mappings_for_file(&self, file_name: &str) -> TabulaResult<Vec<SheetTableMapping>> {
        self.pool
            .readers
            .with_conn(|conn| mapping_ops::mappings_for_file(conn, file_name))
    }

    /// Enhanced mappings, optionally filtered to one file.
    pub fn enhanced_mappings(
        &self,
        file_name: Option<&str>,
    ) -> TabulaResult<Vec<EnhancedMapping>> {
        self.pool
            .readers
            .with_conn(|conn| mapping_ops::enhanced_mappings(conn, file_name))
    }

    /// The backing table for one `(file, sheet)` pair.
    pub fn table_for_sheet(
        &self,
        file_name: &str,
        sheet_name: &str,
    ) -> TabulaResult<Option<String>> {
        self.pool
            .readers
            .with_conn(|conn| mapping_ops::table_for_sheet(conn, file_name, sheet_name))
    }

    /// Ordered column names of a backing table.
    pub fn table_columns(&self, table_name: &str) -> TabulaResult<Vec<String>> {
        self.pool
            .readers
            .with_conn(|conn| table_ops::table_columns(conn, table_name))
    }

    /// Execute a statement batch sequentially on the writer connection, so
    /// statements observe each other's effects in issued order.
    pub fn execute_batch(&self, batch_text: &str) -> TabulaResult<Vec<StatementResult>> {
        self.pool
            .writer
            .with_conn_sync(|conn| Ok(statement_exec::execute_batch(conn, batch_text)))
    }

    /// Drop backing tables no mapping row references.
    pub fn cleanup_orphan_tables(&self) -> TabulaResult<usize> {
        self.pool
            .writer
            .with_conn_sync(maintenance::cleanup_orphan_tables)
    }

    /// Storage statistics for diagnostics.
    pub fn database_info(&self) -> TabulaResult<DatabaseInfo> {
        let (active_files, total_tables) = self.pool.readers.with_conn(|conn| {
            Ok((
                mapping_ops::active_file_count(conn)?,
                mapping_ops::mapping_count(conn)?,
            ))
        })?;
        let database_size_bytes = std::fs::metadata(&self.pool.db_path)
            .map(|m| m.len())
            .unwrap_or(0);
        Ok(DatabaseInfo {
            database_path: self.pool.db_path.display().to_string(),
            database_size_bytes,
            active_files,
            total_tables,
            registry_entries: self.lock_registry()?.len(),
        })
    }

    /// Access the connection pool (for advanced operations and tests).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn path_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        self.path_locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn lock_registry(&self) -> TabulaResult<MutexGuard<'_, FileRegistry>> {
        self.registry
            .lock()
            .map_err(|e| poisoned(&e.to_string()))
    }
}

fn poisoned(message: &str) -> TabulaError {
    TabulaError::Storage(StorageError::LockPoisoned {
        message: message.to_string(),
    })
}
