//! Content addressing: stable blake3 digests of source-file bytes.
//!
//! The digest is the unit of "has this changed?" across the whole system:
//! the sync engine, the header cache, and the index freshness tracker all
//! compare against it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::constants::DIGEST_CHUNK_SIZE;
use crate::errors::{SyncError, TabulaResult};

/// Stream a file through blake3 in fixed-size chunks and return the
/// lowercase hex digest.
pub fn digest_file(path: &Path) -> TabulaResult<String> {
    let mut file = File::open(path).map_err(|e| SyncError::FileAccess {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; DIGEST_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|e| SyncError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Digest an in-memory byte slice.
pub fn digest_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
