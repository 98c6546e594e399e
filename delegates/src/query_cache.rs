//! Read-through query cache with in-flight deduplication.
//!
//! Each key owns a `OnceCell`. The first caller for a key runs the loader;
//! callers arriving while that load is pending wait on the same cell instead
//! of issuing their own request. A failed load drops its empty cell, so the
//! next caller retries. Loaded values are served until they go stale.

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

use crate::config::CacheConfig;

/// Hit/miss counters. A hit is any fetch answered without running its own
/// loader, including fetches that joined a load already in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

type Slot<V> = Arc<OnceCell<(V, Instant)>>;

pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Slot<V>>>,
    stale_time: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(stale_time: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_time,
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.stale_time(), config.max_entries)
    }

    /// Return the cached value for `key`, or run `load` to fill it.
    pub async fn fetch<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, E>> + Send,
    {
        let slot = {
            let mut entries = self.entries.lock().await;
            let reusable = entries
                .get(&key)
                .filter(|slot| match slot.get() {
                    Some((_, loaded_at)) => loaded_at.elapsed() < self.stale_time,
                    None => true,
                })
                .cloned();
            match reusable {
                Some(slot) => slot,
                None => {
                    let slot: Slot<V> = Arc::new(OnceCell::new());
                    entries.insert(key.clone(), slot.clone());
                    self.evict_oldest(&mut entries);
                    slot
                }
            }
        };

        let loaded = AtomicBool::new(false);
        let loaded_ref = &loaded;
        let result = slot
            .get_or_try_init(|| async move {
                loaded_ref.store(true, Ordering::Relaxed);
                load().await.map(|value| (value, Instant::now()))
            })
            .await;
        let (value, _) = match result {
            Ok(entry) => entry,
            Err(e) => {
                self.discard_empty(&key, &slot).await;
                return Err(e);
            }
        };

        if loaded.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value.clone())
    }

    /// Drop the cached value for `key`. Loads already in flight still finish
    /// for the callers waiting on them.
    pub async fn invalidate(&self, key: &K) {
        self.entries.lock().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Remove `key` if it still maps to this same slot and nothing was loaded.
    async fn discard_empty(&self, key: &K, slot: &Slot<V>) {
        let mut entries = self.entries.lock().await;
        let same_empty = entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if same_empty {
            entries.remove(key);
        }
    }

    /// Evict until the cache fits. Empty slots nobody is loading (left by a
    /// cancelled fetch) go first, then loaded entries oldest first. Pending
    /// loads are never evicted.
    fn evict_oldest(&self, entries: &mut HashMap<K, Slot<V>>) {
        if entries.len() <= self.max_entries {
            return;
        }
        // The map holds one reference; any other belongs to a fetch in flight.
        entries.retain(|_, slot| slot.initialized() || Arc::strong_count(slot) > 1);
        if entries.len() <= self.max_entries {
            return;
        }
        let mut loaded: Vec<(K, Instant)> = entries
            .iter()
            .filter_map(|(key, slot)| slot.get().map(|(_, at)| (key.clone(), *at)))
            .collect();
        loaded.sort_by_key(|(_, at)| *at);

        let excess = entries.len() - self.max_entries;
        for (key, _) in loaded.into_iter().take(excess) {
            entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_loader(
        calls: &AtomicUsize,
        value: u32,
    ) -> impl Future<Output = Result<u32, String>> + Send + '_ {
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn second_fetch_is_a_hit() {
        let cache = QueryCache::new(Duration::from_secs(60), 16);
        let calls = AtomicUsize::new(0);

        let first = cache.fetch("k", || counting_loader(&calls, 7)).await;
        let second = cache.fetch("k", || counting_loader(&calls, 8)).await;

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_load() {
        let cache = Arc::new(QueryCache::<&str, u32>::new(Duration::from_secs(60), 16));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .fetch("shared", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, String>(42)
                    })
                    .await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(42));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 7);
    }

    #[tokio::test]
    async fn failed_loads_are_retried() {
        let cache = QueryCache::new(Duration::from_secs(60), 16);

        let failed: Result<u32, String> =
            cache.fetch("k", || async { Err("boom".to_string()) }).await;
        assert_eq!(failed, Err("boom".to_string()));

        let calls = AtomicUsize::new(0);
        let retried = cache.fetch("k", || counting_loader(&calls, 3)).await;
        assert_eq!(retried, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_loads_do_not_grow_the_cache() {
        let cache = QueryCache::<u32, u32>::new(Duration::from_secs(60), 2);

        for key in 0..100 {
            let failed = cache.fetch(key, || async { Err::<u32, _>("down") }).await;
            assert!(failed.is_err());
        }
        assert!(cache.len().await <= 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_loads_are_evicted() {
        let cache = QueryCache::<u32, u32>::new(Duration::from_secs(60), 2);

        for key in 0..20 {
            let fetch = cache.fetch(key, || std::future::pending::<Result<u32, String>>());
            assert!(tokio::time::timeout(Duration::from_millis(5), fetch)
                .await
                .is_err());
        }
        assert!(cache.len().await <= 2);

        let calls = AtomicUsize::new(0);
        assert_eq!(cache.fetch(7, || counting_loader(&calls, 70)).await, Ok(70));
        assert!(cache.len().await <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_values_are_reloaded() {
        let cache = QueryCache::new(Duration::from_secs(30), 16);
        let calls = AtomicUsize::new(0);

        cache.fetch("k", || counting_loader(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.fetch("k", || counting_loader(&calls, 2)).await, Ok(1));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.fetch("k", || counting_loader(&calls, 2)).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn oldest_entries_are_evicted() {
        let cache = QueryCache::new(Duration::from_secs(600), 2);
        let calls = AtomicUsize::new(0);

        for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
            cache.fetch(key, || counting_loader(&calls, value)).await.unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        assert_eq!(cache.len().await, 2);

        // "a" was the oldest and must be loaded again.
        assert_eq!(cache.fetch("a", || counting_loader(&calls, 10)).await, Ok(10));
        assert_eq!(cache.fetch("c", || counting_loader(&calls, 30)).await, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = QueryCache::new(Duration::from_secs(60), 16);
        let calls = AtomicUsize::new(0);

        cache.fetch("k", || counting_loader(&calls, 1)).await.unwrap();
        cache.invalidate(&"k").await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.fetch("k", || counting_loader(&calls, 2)).await, Ok(2));

        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
