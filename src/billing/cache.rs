//! Read-through query cache
//!
//! Entries are keyed by query identity and stay fresh for a fixed window.
//! The store is a bounded Moka cache: expired entries are evicted by the cache
//! itself and the entry count never grows past the configured capacity.
//! Cached values are shared as `Arc<V>` and never mutated in place: a refresh
//! replaces the whole entry, and the most recent write wins.

use moka::future::Cache;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Default upper bound on cached entries
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Identity of a cached query, e.g. `subscription/acct-42`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: &'static str,
    pub id: String,
}

impl QueryKey {
    pub fn new(query: &'static str, id: impl Into<String>) -> Self {
        Self {
            query,
            id: id.into(),
        }
    }

    pub fn subscription(account_id: impl Into<String>) -> Self {
        Self::new("subscription", account_id)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.query, self.id)
    }
}

/// Cache of query results with a freshness window and a capacity bound
pub struct QueryCache<V> {
    ttl: Duration,
    inner: Cache<QueryKey, Arc<V>>,
}

impl<V> QueryCache<V>
where
    V: Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        Self {
            ttl,
            inner: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value, if any
    pub async fn get(&self, key: &QueryKey) -> Option<Arc<V>> {
        self.inner.get(key).await
    }

    /// Store a value, replacing any previous entry
    pub async fn insert(&self, key: QueryKey, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.inner.insert(key, Arc::clone(&value)).await;
        value
    }

    /// Return the fresh value for `key`, or run `fetch` and cache its result.
    ///
    /// Errors are returned to the caller and never cached. Concurrent misses
    /// may fetch more than once; the last response to arrive is kept.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: QueryKey, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            trace!(key = %key, "Cache hit");
            return Ok(value);
        }

        trace!(key = %key, "Cache miss, fetching");
        let value = fetch().await?;
        Ok(self.insert(key, value).await)
    }

    /// Drop an entry so the next read refetches it
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        self.inner.remove(key).await.is_some()
    }

    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Number of live entries, after pending evictions have been applied
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache<V: Send + Sync + 'static>(ttl: Duration) -> QueryCache<V> {
        QueryCache::new(ttl, DEFAULT_MAX_ENTRIES)
    }

    #[tokio::test]
    async fn test_hit_within_window() {
        let cache = cache(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);
        let key = QueryKey::subscription("acct-1");

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(7)
                })
                .await
                .unwrap();
            assert_eq!(*value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = cache(Duration::from_millis(20));
        let calls = AtomicUsize::new(0);
        let key = QueryKey::subscription("acct-1");

        for _ in 0..2 {
            cache
                .get_or_fetch(key.clone(), || async {
                    Ok::<_, ()>(calls.fetch_add(1, Ordering::SeqCst))
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = cache(Duration::from_millis(10));
        for i in 0..200 {
            cache.insert(QueryKey::subscription(format!("acct-{i}")), i).await;
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.insert(QueryKey::subscription("fresh"), 0).await;

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache = QueryCache::new(Duration::from_secs(300), 20);
        for i in 0..200 {
            cache.insert(QueryKey::subscription(format!("acct-{i}")), i).await;
        }
        assert!(cache.len().await <= 20);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: QueryCache<u32> = cache(Duration::from_secs(300));
        let key = QueryKey::subscription("acct-1");

        let result = cache
            .get_or_fetch(key.clone(), || async { Err("unavailable") })
            .await;
        assert_eq!(result.unwrap_err(), "unavailable");
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = cache(Duration::from_secs(300));
        let key = QueryKey::subscription("acct-1");

        cache.insert(key.clone(), "first").await;
        cache.insert(key.clone(), "second").await;
        assert_eq!(*cache.get(&key).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = cache(Duration::from_secs(300));
        let key = QueryKey::subscription("acct-1");
        cache.insert(key.clone(), 1).await;

        assert!(cache.invalidate(&key).await);
        assert!(!cache.invalidate(&key).await);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = cache(Duration::from_secs(300));
        cache.insert(QueryKey::subscription("a"), 1).await;
        cache.insert(QueryKey::subscription("b"), 2).await;

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_keys_are_distinct_per_identity() {
        let cache = cache(Duration::from_secs(300));
        cache.insert(QueryKey::subscription("a"), 1).await;
        cache.insert(QueryKey::new("favorites", "a"), 2).await;

        assert_eq!(*cache.get(&QueryKey::subscription("a")).await.unwrap(), 1);
        assert_eq!(*cache.get(&QueryKey::new("favorites", "a")).await.unwrap(), 2);
        assert_eq!(QueryKey::subscription("a").to_string(), "subscription/a");
    }
}
