// SPDX-License-Identifier: Apache-2.0

//! In-memory TTL caching for classification results.
//!
//! A small bounded cache with per-entry expiry. Entries past their TTL are
//! treated as absent and evicted lazily; when the cache is full the oldest
//! entry is evicted first. The cache is an optimization only - disabling it
//! must never change results, so values are idempotent last-write-wins
//! overwrites and the interior `Mutex` is the only locking discipline.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A bounded in-memory cache with per-entry time-to-live.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a new cache.
    ///
    /// # Arguments
    ///
    /// * `ttl` - Time-to-live for each entry
    /// * `capacity` - Maximum number of entries held at once
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a value, returning `None` if absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let expired = match entries.get(key) {
            Some((value, inserted_at)) => {
                if inserted_at.elapsed() < self.ttl {
                    return Some(value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Insert a value, evicting expired entries first and then the oldest
    /// entry if the cache is still at capacity.
    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            entries.retain(|_, (_, inserted_at)| inserted_at.elapsed() < self.ttl);

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, (_, inserted_at))| *inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest_key) = oldest {
                    entries.remove(&oldest_key);
                }
            }
        }

        entries.insert(key, (value, Instant::now()));
    }

    /// Number of entries currently held (including not-yet-evicted expired ones).
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60), 16);
        cache.insert("key".to_string(), 42u32);
        assert_eq!(cache.get("key"), Some(42));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60), 16);
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = TtlCache::new(Duration::from_millis(0), 16);
        cache.insert("key".to_string(), 42u32);
        assert_eq!(cache.get("key"), None);
        // Lazy eviction removed the entry on lookup
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), 1u32);
        cache.insert("b".to_string(), 2u32);
        cache.insert("c".to_string(), 3u32);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("c"), Some(3));
        // "a" was the oldest entry
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_overwrite_existing_key_at_capacity() {
        let cache = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), 1u32);
        cache.insert("b".to_string(), 2u32);
        cache.insert("a".to_string(), 10u32);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
    }
}
