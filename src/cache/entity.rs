//! Id-keyed entity cache

use crate::metrics;
use feedstore::{DbTweet, DbUser, TweetId, UserId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// A record that knows its own id
pub trait Keyed {
    type Key: Clone + Eq + Hash;

    /// Label used in logs and metrics ("user", "tweet")
    const ENTITY: &'static str;

    fn key(&self) -> &Self::Key;
}

impl Keyed for DbUser {
    type Key = UserId;
    const ENTITY: &'static str = "user";

    fn key(&self) -> &UserId {
        &self.id
    }
}

impl Keyed for DbTweet {
    type Key = TweetId;
    const ENTITY: &'static str = "tweet";

    fn key(&self) -> &TweetId {
        &self.id
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Request-scoped map from id to record
///
/// A miss means "not fetched yet in this request", never "does not exist".
/// There is no eviction; the cache lives exactly as long as its request.
/// The lock is only held for map operations, never across an await.
pub struct EntityCache<V: Keyed> {
    entries: Mutex<HashMap<V::Key, Arc<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Keyed> Default for EntityCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<V: Keyed> EntityCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<V::Key, Arc<V>>> {
        // Entries are only ever inserted whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a batch of records; an existing id is overwritten (last write wins)
    pub fn populate<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = Arc<V>>,
    {
        let mut entries = self.lock();
        let mut inserted = 0;
        for record in records {
            entries.insert(record.key().clone(), record);
            inserted += 1;
        }
        tracing::debug!(entity = V::ENTITY, inserted, total = entries.len(), "Cache populated");
        inserted
    }

    /// Look up a record; `None` is a miss and tells the caller to fall back to the store
    pub fn get(&self, key: &V::Key) -> Option<Arc<V>> {
        let found = self.lock().get(key).cloned();
        match found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_hit(V::ENTITY);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_miss(V::ENTITY);
            }
        }
        found
    }

    /// Look up a record without counting a hit or miss
    ///
    /// Used for the re-read after a store fallback, which already counted
    /// its miss.
    pub fn peek(&self, key: &V::Key) -> Option<Arc<V>> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<V: Keyed> std::fmt::Debug for EntityCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("entity", &V::ENTITY)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<Arc<DbUser>> {
        ids.iter()
            .map(|id| Arc::new(DbUser::new(*id, format!("h-{}", id), "Name")))
            .collect()
    }

    #[test]
    fn test_populate_then_get() {
        let cache = EntityCache::<DbUser>::new();
        assert_eq!(cache.populate(users(&["u1", "u2"])), 2);

        let hit = cache.get(&UserId::new("u1")).unwrap();
        assert_eq!(hit.handle, "h-u1");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_miss_is_none_not_error() {
        let cache = EntityCache::<DbTweet>::new();
        assert!(cache.get(&TweetId::new("t1")).is_none());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_repeated_get_is_stable() {
        let cache = EntityCache::<DbUser>::new();
        cache.populate(users(&["u1"]));

        let first = cache.get(&UserId::new("u1")).unwrap();
        let second = cache.get(&UserId::new("u1")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = EntityCache::<DbUser>::new();
        cache.populate(vec![Arc::new(DbUser::new("u1", "old", "Old"))]);
        cache.populate(vec![Arc::new(DbUser::new("u1", "new", "New"))]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&UserId::new("u1")).unwrap().handle, "new");
    }

    #[test]
    fn test_peek_does_not_touch_stats() {
        let cache = EntityCache::<DbUser>::new();
        cache.populate(users(&["u1"]));

        assert!(cache.peek(&UserId::new("u1")).is_some());
        assert!(cache.peek(&UserId::new("u2")).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 0, entries: 1 });
    }
}
