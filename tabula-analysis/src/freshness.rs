//! Vector-index freshness: decide whether the external embedding pipeline
//! must run again, by comparing current source-file digests against the
//! snapshot recorded at the last index build.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use tabula_core::errors::{IndexError, SyncError, TabulaResult};
use tabula_core::hashing;
use tabula_core::models::{IndexSnapshot, SourceFile};

const SNAPSHOT_FILE: &str = "index_snapshot.json";

/// Outcome of a freshness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessReport {
    /// True if any file was added, removed, or re-digested since the last
    /// snapshot (or no snapshot exists).
    pub changed: bool,
    pub current_files: BTreeMap<String, String>,
    pub previous: Option<IndexSnapshot>,
}

pub struct FreshnessTracker {
    index_dir: PathBuf,
}

impl FreshnessTracker {
    pub fn new(index_dir: &Path) -> Self {
        Self {
            index_dir: index_dir.to_path_buf(),
        }
    }

    /// Digest every spreadsheet in the source directory.
    pub fn scan_directory(&self, source_dir: &Path) -> TabulaResult<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();
        if !source_dir.is_dir() {
            return Ok(files);
        }
        let entries = std::fs::read_dir(source_dir).map_err(|e| SyncError::FileAccess {
            path: source_dir.display().to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !SourceFile::is_spreadsheet(&path) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match hashing::digest_file(&path) {
                Ok(digest) => {
                    files.insert(file_name.to_string(), digest);
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "skipping undigestable file")
                }
            }
        }
        Ok(files)
    }

    /// Compare the directory's current digests against the stored snapshot.
    pub fn check(&self, source_dir: &Path) -> TabulaResult<FreshnessReport> {
        let current_files = self.scan_directory(source_dir)?;
        let previous = self.load_snapshot()?;
        let changed = match &previous {
            Some(snapshot) => has_changed(&current_files, &snapshot.files),
            None => true,
        };
        if !changed {
            info!("source files unchanged since last index build");
        }
        Ok(FreshnessReport {
            changed,
            current_files,
            previous,
        })
    }

    /// Load the stored snapshot. Absent or corrupt snapshots read as None —
    /// the safe fallback is a rebuild.
    pub fn load_snapshot(&self) -> TabulaResult<Option<IndexSnapshot>> {
        let path = self.snapshot_path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(IndexError::SnapshotRead {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt index snapshot, forcing rebuild");
                Ok(None)
            }
        }
    }

    /// Persist the snapshot after a successful index build.
    pub fn save_snapshot(&self, snapshot: &IndexSnapshot) -> TabulaResult<()> {
        std::fs::create_dir_all(&self.index_dir).map_err(|e| IndexError::SnapshotWrite {
            path: self.index_dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = self.snapshot_path();
        let raw = serde_json::to_string_pretty(snapshot).map_err(|e| {
            IndexError::SnapshotWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        std::fs::write(&path, raw).map_err(|e| {
            IndexError::SnapshotWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.index_dir.join(SNAPSHOT_FILE)
    }
}

/// Any added, removed, or changed file invalidates the index.
pub fn has_changed(
    current: &BTreeMap<String, String>,
    previous: &BTreeMap<String, String>,
) -> bool {
    for (file, digest) in current {
        match previous.get(file) {
            None => {
                info!(file = %file, "new source file detected");
                return true;
            }
            Some(prev) if prev != digest => {
                info!(file = %file, "source file changed");
                return true;
            }
            _ => {}
        }
    }
    for file in previous.keys() {
        if !current.contains_key(file) {
            info!(file = %file, "source file removed");
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digests(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unchanged_sets_compare_equal() {
        let a = digests(&[("a.xlsx", "h1"), ("b.xlsx", "h2")]);
        assert!(!has_changed(&a, &a.clone()));
    }

    #[test]
    fn added_removed_and_modified_all_trigger() {
        let previous = digests(&[("a.xlsx", "h1"), ("b.xlsx", "h2")]);
        assert!(has_changed(
            &digests(&[("a.xlsx", "h1"), ("b.xlsx", "h2"), ("c.xlsx", "h3")]),
            &previous
        ));
        assert!(has_changed(&digests(&[("a.xlsx", "h1")]), &previous));
        assert!(has_changed(
            &digests(&[("a.xlsx", "CHANGED"), ("b.xlsx", "h2")]),
            &previous
        ));
    }

    #[test]
    fn scan_digests_only_spreadsheets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xlsx"), b"aa").unwrap();
        std::fs::write(dir.path().join("b.xls"), b"bb").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"cc").unwrap();

        let tracker = FreshnessTracker::new(&dir.path().join("index"));
        let files = tracker.scan_directory(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files.get("a.xlsx").map(String::as_str),
            Some(hashing::digest_bytes(b"aa").as_str())
        );
    }

    #[test]
    fn snapshot_roundtrip_and_check() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::write(source_dir.join("a.xlsx"), b"v1").unwrap();

        let tracker = FreshnessTracker::new(&dir.path().join("index"));

        // No snapshot yet: a rebuild is needed.
        let report = tracker.check(&source_dir).unwrap();
        assert!(report.changed);
        assert!(report.previous.is_none());

        // After saving the snapshot, the same directory is fresh.
        tracker
            .save_snapshot(&IndexSnapshot::new(report.current_files.clone()))
            .unwrap();
        let report = tracker.check(&source_dir).unwrap();
        assert!(!report.changed);

        // Editing a file invalidates again.
        std::fs::write(source_dir.join("a.xlsx"), b"v2").unwrap();
        assert!(tracker.check(&source_dir).unwrap().changed);
    }

    #[test]
    fn corrupt_snapshot_forces_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("index");
        std::fs::create_dir_all(&index_dir).unwrap();
        std::fs::write(index_dir.join(SNAPSHOT_FILE), "{ not json").unwrap();

        let tracker = FreshnessTracker::new(&index_dir);
        assert!(tracker.load_snapshot().unwrap().is_none());
    }
}
