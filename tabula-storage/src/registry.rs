//! JSON registry of file name → last synced content digest.
//!
//! Loaded tolerantly: a missing or corrupt registry starts empty (the worst
//! case is a full resync). Saves must succeed — a silently lost digest
//! would leave the registry and the database permanently divergent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use tabula_core::errors::{SyncError, TabulaResult};

#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileRegistry {
    /// Load the registry from disk, starting empty when absent or corrupt.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "corrupt file registry, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// The digest recorded at the last fully-successful sync of a file.
    pub fn stored_hash(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    /// Record a digest and persist the registry.
    pub fn record(&mut self, file_name: &str, hash: &str) -> TabulaResult<()> {
        self.entries
            .insert(file_name.to_string(), hash.to_string());
        self.save()
    }

    /// Forget a file and persist the registry.
    pub fn remove(&mut self, file_name: &str) -> TabulaResult<()> {
        if self.entries.remove(file_name).is_some() {
            self.save()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> TabulaResult<()> {
        let raw = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            SyncError::RegistryWrite {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SyncError::RegistryWrite {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }
        std::fs::write(&self.path, raw).map_err(|e| SyncError::RegistryWrite {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
