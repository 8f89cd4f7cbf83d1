//! Two-tier read-through header cache, validated by content digest.
//!
//! Memory tier for sub-microsecond hits, persistent tier for restart
//! survival. An entry is only ever served while the source file's digest
//! still matches the digest recorded at write time.

mod memory_tier;
mod persistent_tier;

pub use memory_tier::MemoryTier;
pub use persistent_tier::PersistentTier;

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use tabula_core::constants::HEADER_SCHEMA_VERSION;
use tabula_core::errors::TabulaResult;
use tabula_core::hashing;
use tabula_core::models::HeaderCacheEntry;

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_count: usize,
    pub persistent_count: usize,
    pub capacity: usize,
}

pub struct HeaderCache {
    memory: MemoryTier,
    persistent: PersistentTier,
}

impl HeaderCache {
    /// Open the cache over a directory of persistent entries.
    pub fn open(cache_dir: &Path, max_memory_entries: usize) -> TabulaResult<Self> {
        Ok(Self {
            memory: MemoryTier::new(max_memory_entries),
            persistent: PersistentTier::open(cache_dir)?,
        })
    }

    /// Read-through lookup. A stale or version-mismatched entry is purged
    /// from whichever tier held it and reported as a miss; a valid
    /// persistent entry is promoted into the memory tier.
    pub fn get(&self, path: &Path, sheet_name: &str) -> TabulaResult<Option<String>> {
        let key = key_for(path, sheet_name);

        if let Some(entry) = self.memory.get(&key) {
            if self.is_valid(path, &entry) {
                debug!(key = %key, "memory tier hit");
                return Ok(Some(entry.header_summary));
            }
            self.memory.remove(&key);
        }

        match self.persistent.load(&key)? {
            Some(entry) if self.is_valid(path, &entry) => {
                debug!(key = %key, "persistent tier hit, promoting");
                let summary = entry.header_summary.clone();
                self.memory.insert(key, entry);
                Ok(Some(summary))
            }
            Some(_) => {
                debug!(key = %key, "stale persistent entry purged");
                self.persistent.delete(&key)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Write-through: persist first, then refresh the memory tier.
    pub fn put(&self, path: &Path, sheet_name: &str, summary: &str) -> TabulaResult<()> {
        let content_hash = hashing::digest_file(path)?;
        let entry = HeaderCacheEntry {
            source_file_name: file_name_of(path),
            sheet_name: sheet_name.to_string(),
            content_hash,
            schema_version: HEADER_SCHEMA_VERSION,
            header_summary: summary.to_string(),
            cached_at: Utc::now(),
        };
        let key = key_for(path, sheet_name);
        self.persistent.store(&key, &entry)?;
        self.memory.insert(key, entry);
        Ok(())
    }

    /// An entry is valid iff the file still exists, its current digest
    /// matches the recorded one, and the schema version is current.
    pub fn is_valid(&self, path: &Path, entry: &HeaderCacheEntry) -> bool {
        if entry.schema_version != HEADER_SCHEMA_VERSION {
            return false;
        }
        match hashing::digest_file(path) {
            Ok(digest) => digest == entry.content_hash,
            Err(_) => false,
        }
    }

    /// Drop all memory entries and all persistent entries.
    pub fn clear(&self) -> TabulaResult<()> {
        self.memory.clear();
        self.persistent.clear()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_count: self.memory.len(),
            persistent_count: self.persistent.len(),
            capacity: self.memory.capacity(),
        }
    }
}

fn key_for(path: &Path, sheet_name: &str) -> String {
    let file_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    HeaderCacheEntry::cache_key(file_stem, sheet_name)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
