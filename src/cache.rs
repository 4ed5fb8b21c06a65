//! Bounded TTL cache with stale-on-error reads.
//!
//! Upstream lookups (weather, exchange rates, encyclopedia summaries) read
//! through a [`TtlCache`]: a fresh hit skips the network, and when the
//! network fails the last-known-good value is served instead.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// LRU cache whose entries expire after `ttl` but are kept around as
/// stale fallbacks until evicted by capacity.
pub struct TtlCache<K: Hash + Eq, V: Clone> {
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Value inserted less than `ttl` ago.
    pub async fn get_fresh(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Last-known-good value regardless of age.
    pub async fn get_stale(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        entries.get(key).map(|e| e.value.clone())
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        entries.put(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_hit() {
        let cache = TtlCache::new(4, Duration::from_secs(60));
        cache.insert("banjul", 28).await;
        assert_eq!(cache.get_fresh(&"banjul").await, Some(28));
        assert_eq!(cache.get_fresh(&"kololi").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_stale_only() {
        let cache = TtlCache::new(4, Duration::from_millis(50));
        cache.insert("rates", 70.0).await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get_fresh(&"rates").await, None);
        assert_eq!(cache.get_stale(&"rates").await, Some(70.0));
    }

    #[tokio::test]
    async fn test_insert_refreshes_entry() {
        let cache = TtlCache::new(4, Duration::from_millis(50));
        cache.insert("k", 1).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        cache.insert("k", 2).await;
        assert_eq!(cache.get_fresh(&"k").await, Some(2));
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recent() {
        let cache = TtlCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.get_fresh(&"a").await;
        cache.insert("c", 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get_stale(&"b").await, None);
        assert_eq!(cache.get_stale(&"a").await, Some(1));
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let cache = TtlCache::new(0, Duration::from_secs(60));
        cache.insert("a", 1).await;
        assert_eq!(cache.get_fresh(&"a").await, Some(1));
    }
}
