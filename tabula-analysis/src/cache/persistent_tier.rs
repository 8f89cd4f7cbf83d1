//! Persistent cache tier: one JSON entry file per file+sheet key.
//!
//! Survives process restarts. A malformed entry is evicted on read and
//! treated as a miss; the safe fallback is always a fresh analysis.

use std::path::{Path, PathBuf};

use tracing::warn;

use tabula_core::errors::{CacheError, TabulaResult};
use tabula_core::models::HeaderCacheEntry;

pub struct PersistentTier {
    dir: PathBuf,
}

impl PersistentTier {
    /// Open the tier, creating the cache directory if needed.
    pub fn open(dir: &Path) -> TabulaResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Load an entry. A corrupt file is deleted and reported as a miss; an
    /// unreadable directory is an error.
    pub fn load(&self, key: &str) -> TabulaResult<Option<HeaderCacheEntry>> {
        let path = self.entry_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                let cause = CacheError::Corruption {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %cause, "evicting corrupt cache entry");
                let _ = std::fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    pub fn store(&self, key: &str, entry: &HeaderCacheEntry) -> TabulaResult<()> {
        let path = self.entry_path(key);
        let raw = serde_json::to_string_pretty(entry).map_err(|e| CacheError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| {
            CacheError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn delete(&self, key: &str) -> TabulaResult<()> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Number of entry files currently on disk.
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.path()
                            .extension()
                            .is_some_and(|ext| ext == "json")
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete every entry file.
    pub fn clear(&self) -> TabulaResult<()> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path).map_err(|e| CacheError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
