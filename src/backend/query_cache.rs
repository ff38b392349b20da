//! Query cache.
//!
//! The router keeps all cache state on the leader, so the same query
//! hits the cache no matter which replica served it first.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::CacheKey;

/// Query cache protocol.
pub trait QueryCache<T>: Send + Sync {
    /// Is caching on?
    fn enabled(&self) -> bool;

    /// Turn caching on.
    fn enable(&self);

    /// Turn caching off and drop all entries.
    fn disable(&self);

    /// Drop all entries.
    fn clear(&self);

    /// Look up a cached result.
    fn get(&self, key: &CacheKey) -> Option<T>;

    /// Store a result.
    fn store(&self, key: CacheKey, value: T);
}

/// Return the cached result for `key`, or run `body` and cache what it returns.
///
/// `body` is only polled on a cache miss. Errors are not cached.
pub async fn with_cache<T, E, F>(cache: &dyn QueryCache<T>, key: CacheKey, body: F) -> Result<T, E>
where
    T: Clone,
    F: Future<Output = Result<T, E>>,
{
    if let Some(value) = cache.get(&key) {
        debug!("query cache hit: {}", key.sql);
        return Ok(value);
    }

    let value = body.await?;
    cache.store(key, value.clone());

    Ok(value)
}

/// Cache statistics.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Stats {
    /// Cache hits.
    pub hits: usize,
    /// Cache misses.
    pub misses: usize,
}

#[derive(Debug)]
struct Inner<T> {
    queries: HashMap<CacheKey, T>,
    enabled: bool,
    stats: Stats,
}

/// In-memory query cache.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                queries: HashMap::new(),
                enabled: false,
                stats: Stats::default(),
            })),
        }
    }
}

impl<T> Cache<T> {
    /// New disabled cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.inner.lock().queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache stats.
    pub fn stats(&self) -> Stats {
        self.inner.lock().stats
    }
}

impl<T: Clone + Send + Sync> QueryCache<T> for Cache<T> {
    fn enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    fn enable(&self) {
        self.inner.lock().enabled = true;
    }

    fn disable(&self) {
        let mut guard = self.inner.lock();
        guard.enabled = false;
        guard.queries.clear();
    }

    fn clear(&self) {
        let mut guard = self.inner.lock();
        guard.queries.clear();
        guard.queries.shrink_to_fit();
    }

    fn get(&self, key: &CacheKey) -> Option<T> {
        let mut guard = self.inner.lock();
        match guard.queries.get(key).cloned() {
            Some(value) => {
                guard.stats.hits += 1;
                Some(value)
            }
            None => {
                guard.stats.misses += 1;
                None
            }
        }
    }

    fn store(&self, key: CacheKey, value: T) {
        let mut guard = self.inner.lock();
        if guard.enabled {
            guard.queries.insert(key, value);
        }
    }
}
