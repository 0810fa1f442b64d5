//! In-memory cache of scene descriptors seen by `/search`.
//!
//! Lets `/process/{itemId}` resolve an item without a second catalog round
//! trip. Entries are keyed by item id.
//!
//! ## Eviction Strategy
//! - Entry-count LRU eviction when capacity is reached
//! - TTL-based expiration on read (lazy)

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use stac_client::StacItem;

use crate::config::CacheConfig;

struct CachedItem {
    item: StacItem,
    inserted_at: Instant,
}

/// Statistics for the item cache.
#[derive(Debug, Default)]
pub struct ItemCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    /// Entries pushed out by LRU capacity.
    pub evictions: AtomicU64,
    /// Entries dropped on read after their TTL.
    pub expired: AtomicU64,
    pub entry_count: AtomicU64,
}

impl ItemCacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// TTL + LRU cache from item id to [`StacItem`].
///
/// `put` overwrites unconditionally and restarts the entry's TTL. Readers
/// always get a whole descriptor.
pub struct ItemCache {
    cache: RwLock<LruCache<String, CachedItem>>,
    ttl: Duration,
    stats: ItemCacheStats,
}

impl ItemCache {
    /// A zero `max_entries` is treated as 1.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);

        tracing::info!(
            max_entries = capacity.get(),
            ttl_secs = ttl.as_secs(),
            "ItemCache initialized"
        );

        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            ttl,
            stats: ItemCacheStats::default(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, Duration::from_secs(config.ttl_secs))
    }

    /// Look up an item, dropping it if its TTL has passed.
    pub async fn get(&self, item_id: &str) -> Option<StacItem> {
        let mut cache = self.cache.write().await;

        let expired = match cache.get(item_id) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.item.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired && cache.pop(item_id).is_some() {
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            self.stats.entry_count.fetch_sub(1, Ordering::Relaxed);
            tracing::debug!(item_id, "ItemCache entry expired");
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store an item under its id.
    pub async fn put(&self, item: StacItem) {
        let key = item.id.clone();
        let entry = CachedItem {
            item,
            inserted_at: Instant::now(),
        };

        let mut cache = self.cache.write().await;
        match cache.push(key.clone(), entry) {
            // Same key: replaced in place.
            Some((old_key, _)) if old_key == key => {}
            Some((evicted, _)) => {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(item_id = %evicted, "ItemCache evicted entry");
            }
            None => {
                self.stats.entry_count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Store every item, in order.
    pub async fn put_all(&self, items: &[StacItem]) {
        for item in items {
            self.put(item.clone()).await;
        }
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    pub fn stats(&self) -> &ItemCacheStats {
        &self.stats
    }
}
