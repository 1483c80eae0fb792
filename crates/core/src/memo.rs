//! Memoizing cache
//!
//! Lazily computes a value per key on first access and keeps it for the
//! lifetime of the cache. There is no eviction: the cache only grows until
//! it is cleared or dropped. Confine one cache to one simulation run; wrap it
//! in a `Mutex` if it must be shared across runs.

use std::collections::HashMap;
use std::hash::Hash;

/// Unbounded get-or-compute cache
#[derive(Debug, Clone)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, V>,
    hits: u64,
    misses: u64,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries.entry(key).or_insert_with_key(compute)
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// Nothing is stored when `compute` fails.
    pub fn try_get_or_compute<F, E>(&mut self, key: K, compute: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        if self.entries.contains_key(&key) {
            self.hits += 1;
            return Ok(&self.entries[&key]);
        }

        self.misses += 1;
        let value = compute(&key)?;
        Ok(self.entries.entry(key).or_insert(value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation or the last clear
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computes_once_per_key() {
        let mut cache: MemoCache<u32, u32> = MemoCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let value = *cache.get_or_compute(4, |k| {
                calls += 1;
                k * k
            });
            assert_eq!(value, 16);
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), (2, 1));
    }

    #[test]
    fn test_failed_compute_is_not_cached() {
        let mut cache: MemoCache<&str, usize> = MemoCache::new();

        let err: Result<&usize, String> = cache.try_get_or_compute("bad", |_| Err("boom".into()));
        assert!(err.is_err());
        assert!(!cache.contains(&"bad"));

        let ok: Result<&usize, String> = cache.try_get_or_compute("good", |k| Ok(k.len()));
        assert_eq!(ok, Ok(&4));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_resets_entries_and_stats() {
        let mut cache: MemoCache<u8, u8> = MemoCache::default();
        cache.get_or_compute(1, |k| *k);
        cache.get_or_compute(1, |k| *k);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), (0, 0));
        assert_eq!(cache.get(&1), None);
    }
}
