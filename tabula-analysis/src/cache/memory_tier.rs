//! In-memory cache tier: a capped concurrent map with
//! least-recently-refreshed eviction.

use dashmap::DashMap;

use tabula_core::models::HeaderCacheEntry;

/// Memory tier. Holds at most `capacity` entries; inserting beyond that
/// evicts the entry with the oldest `cached_at`, ties broken by key order
/// so eviction is deterministic. Concurrent writers for distinct keys are
/// safe; same-key writes are last-writer-wins.
pub struct MemoryTier {
    entries: DashMap<String, HeaderCacheEntry>,
    capacity: usize,
}

impl MemoryTier {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<HeaderCacheEntry> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn insert(&self, key: String, entry: HeaderCacheEntry) {
        // Refreshing an existing key never evicts.
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.entries.insert(key, entry);
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .map(|entry| (entry.value().cached_at, entry.key().clone()))
            .min();
        if let Some((_, key)) = oldest {
            self.entries.remove(&key);
        }
    }
}
