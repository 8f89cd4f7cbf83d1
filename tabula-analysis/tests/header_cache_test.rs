//! Header cache behavior across both tiers: digest validation, promotion,
//! capacity bounds, schema-version invalidation.

use chrono::Utc;
use tabula_analysis::HeaderCache;
use tabula_core::constants::HEADER_SCHEMA_VERSION;
use tabula_core::hashing;
use tabula_core::models::HeaderCacheEntry;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn cache_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("headers")
    }

    fn cache(&self, capacity: usize) -> HeaderCache {
        HeaderCache::open(&self.cache_dir(), capacity).unwrap()
    }

    fn source(&self, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

#[test]
fn put_then_get_returns_the_summary() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");

    cache.put(&source, "Sheet1", "item | qty | price").unwrap();
    assert_eq!(
        cache.get(&source, "Sheet1").unwrap().as_deref(),
        Some("item | qty | price")
    );
}

#[test]
fn absent_key_is_a_plain_miss() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");
    assert_eq!(cache.get(&source, "NoSuchSheet").unwrap(), None);
}

#[test]
fn changed_bytes_invalidate_the_unchanged_key() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");

    cache.put(&source, "Sheet1", "old headers").unwrap();
    std::fs::write(&source, b"v2 - one cell edited").unwrap();

    assert_eq!(cache.get(&source, "Sheet1").unwrap(), None);
    // The stale persistent entry was purged, not retained.
    assert_eq!(cache.stats().persistent_count, 0);
    assert_eq!(cache.stats().memory_count, 0);
}

#[test]
fn valid_persistent_entry_survives_restart_and_promotes() {
    let fx = Fixture::new();
    let source = fx.source("catalog.xlsx", b"v1");

    {
        let cache = fx.cache(10);
        cache.put(&source, "Sheet1", "persisted headers").unwrap();
    }

    // Fresh cache instance: memory tier empty, persistent tier warm.
    let cache = fx.cache(10);
    assert_eq!(cache.stats().memory_count, 0);
    assert_eq!(
        cache.get(&source, "Sheet1").unwrap().as_deref(),
        Some("persisted headers")
    );
    assert_eq!(cache.stats().memory_count, 1, "hit must promote to memory");
}

#[test]
fn memory_count_never_exceeds_capacity() {
    let fx = Fixture::new();
    let cache = fx.cache(2);

    for i in 0..5 {
        let source = fx.source(&format!("file{i}.xlsx"), format!("bytes {i}").as_bytes());
        cache.put(&source, "Sheet1", &format!("headers {i}")).unwrap();
        assert!(cache.stats().memory_count <= 2);
    }
    let stats = cache.stats();
    assert_eq!(stats.memory_count, 2);
    assert_eq!(stats.persistent_count, 5);
    assert_eq!(stats.capacity, 2);
}

#[test]
fn evicted_entries_are_still_served_from_the_persistent_tier() {
    let fx = Fixture::new();
    let cache = fx.cache(1);
    let first = fx.source("first.xlsx", b"first");
    let second = fx.source("second.xlsx", b"second");

    cache.put(&first, "Sheet1", "first headers").unwrap();
    cache.put(&second, "Sheet1", "second headers").unwrap();
    assert_eq!(cache.stats().memory_count, 1);

    // `first` was evicted from memory but persists on disk.
    assert_eq!(
        cache.get(&first, "Sheet1").unwrap().as_deref(),
        Some("first headers")
    );
}

#[test]
fn old_schema_version_is_invalid_even_with_matching_digest() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");

    let stale = HeaderCacheEntry {
        source_file_name: "catalog.xlsx".to_string(),
        sheet_name: "Sheet1".to_string(),
        content_hash: hashing::digest_file(&source).unwrap(),
        schema_version: HEADER_SCHEMA_VERSION + 1,
        header_summary: "written by a different version".to_string(),
        cached_at: Utc::now(),
    };
    let entry_path = fx.cache_dir().join("catalog__Sheet1.json");
    std::fs::write(&entry_path, serde_json::to_string(&stale).unwrap()).unwrap();

    assert_eq!(cache.get(&source, "Sheet1").unwrap(), None);
    assert!(!entry_path.exists(), "invalid entry must be purged");
}

#[test]
fn corrupt_persistent_entry_reads_as_miss() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");

    std::fs::create_dir_all(fx.cache_dir()).unwrap();
    std::fs::write(fx.cache_dir().join("catalog__Sheet1.json"), "{ not json").unwrap();

    assert_eq!(cache.get(&source, "Sheet1").unwrap(), None);
    assert_eq!(cache.stats().persistent_count, 0);
}

#[test]
fn clear_drops_both_tiers() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    for i in 0..3 {
        let source = fx.source(&format!("f{i}.xlsx"), format!("{i}").as_bytes());
        cache.put(&source, "Sheet1", "headers").unwrap();
    }

    cache.clear().unwrap();
    let stats = cache.stats();
    assert_eq!(stats.memory_count, 0);
    assert_eq!(stats.persistent_count, 0);
}

#[test]
fn missing_file_invalidates_its_entries() {
    let fx = Fixture::new();
    let cache = fx.cache(10);
    let source = fx.source("catalog.xlsx", b"v1");

    cache.put(&source, "Sheet1", "headers").unwrap();
    std::fs::remove_file(&source).unwrap();

    assert_eq!(cache.get(&source, "Sheet1").unwrap(), None);
}
