//! Keyed memoization for slow-changing reference lists.
//!
//! Catalog items, territories and similar lists are fetched once per
//! session. The cache stores the in-flight initialization per key, so
//! callers that arrive while a producer is still running await that same
//! producer instead of starting another one.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Session-scoped cache of produced values.
///
/// Entries never expire; use [`ReferenceCache::invalidate`] or
/// [`ReferenceCache::clear`] when the upstream data is known to change.
#[derive(Debug)]
pub struct ReferenceCache<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for ReferenceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> ReferenceCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: K) -> Arc<OnceCell<V>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_default())
    }

    /// Cached value for `key`, running `producer` if nothing is cached yet.
    pub async fn get_cached<F, Fut>(&self, key: K, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = self.cell(key.clone());
        cell.get_or_init(move || async move {
            tracing::debug!(?key, "producing reference list");
            producer().await
        })
        .await
        .clone()
    }

    /// Like [`get_cached`](Self::get_cached) for producers that can fail.
    ///
    /// A failed producer leaves the key empty; the next caller retries.
    pub async fn try_get_cached<F, Fut, E>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key.clone());
        cell.get_or_try_init(move || async move {
            tracing::debug!(?key, "producing reference list");
            producer().await
        })
        .await
        .cloned()
    }

    /// Cached value without producing one.
    pub fn peek(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drop one key. Callers already awaiting its producer still get its value.
    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Number of keys holding a produced value.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
