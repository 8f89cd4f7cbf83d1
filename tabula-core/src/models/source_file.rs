//! A spreadsheet source file as seen by one sync pass.

use std::path::{Path, PathBuf};

use crate::constants::SPREADSHEET_EXTENSIONS;
use crate::errors::{SyncError, TabulaResult};
use crate::hashing;

/// Identity and current digest of a source file. The identity is the path;
/// `last_synced_hash` is filled from the digest registry by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name including extension; the registry and mapping key.
    pub file_name: String,
    /// File stem without extension; input to table naming.
    pub base_name: String,
    pub content_hash: String,
    pub last_synced_hash: Option<String>,
}

impl SourceFile {
    /// Identify and digest a file on disk.
    pub fn inspect(path: &Path) -> TabulaResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| SyncError::FileAccess {
                path: path.display().to_string(),
                reason: "path has no file name".to_string(),
            })?;
        let base_name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or(&file_name)
            .to_string();
        let content_hash = hashing::digest_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            base_name,
            content_hash,
            last_synced_hash: None,
        })
    }

    /// Whether the current digest matches the last synced one.
    pub fn is_unchanged(&self) -> bool {
        self.last_synced_hash.as_deref() == Some(self.content_hash.as_str())
    }

    /// Whether a path looks like a spreadsheet source by extension.
    pub fn is_spreadsheet(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_fills_names_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");
        std::fs::write(&path, b"bytes").unwrap();

        let source = SourceFile::inspect(&path).unwrap();
        assert_eq!(source.file_name, "catalog.xlsx");
        assert_eq!(source.base_name, "catalog");
        assert_eq!(source.content_hash, hashing::digest_bytes(b"bytes"));
        assert!(!source.is_unchanged());
    }

    #[test]
    fn unchanged_when_hashes_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");
        std::fs::write(&path, b"bytes").unwrap();

        let mut source = SourceFile::inspect(&path).unwrap();
        source.last_synced_hash = Some(source.content_hash.clone());
        assert!(source.is_unchanged());
    }

    #[test]
    fn spreadsheet_extensions_are_case_insensitive() {
        assert!(SourceFile::is_spreadsheet(Path::new("a/b/report.XLSX")));
        assert!(SourceFile::is_spreadsheet(Path::new("legacy.xls")));
        assert!(!SourceFile::is_spreadsheet(Path::new("notes.csv")));
        assert!(!SourceFile::is_spreadsheet(Path::new("bare")));
    }
}
