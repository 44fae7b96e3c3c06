//! Thread-safe wrapper around [`LruCache`].
//!
//! The cache is the one component of the terrain core with an explicit
//! thread-safety requirement. `SharedLruCache` meets it with a single
//! mutex around the whole cache: coarse, but every operation is O(1) so
//! the critical sections are tiny, and correctness under concurrent
//! mutation comes for free.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use super::{CacheStats, LruCache};

/// A clonable, thread-safe handle to a shared [`LruCache`].
///
/// All operations lock internally and mirror the single-threaded cache;
/// lookups clone the value out because a reference cannot outlive the
/// lock guard.
///
/// # Panics
/// Every operation panics if the lock is poisoned (a thread panicked while
/// holding it), matching the rest of the crate's lock handling.
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K: Eq + Hash + Clone, V> SharedLruCache<K, V> {
    /// Creates an empty shared cache that holds at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        SharedLruCache {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Looks up a key, cloning the value out on a hit.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().unwrap().get(key).cloned()
    }

    /// Inserts or overwrites an entry; see [`LruCache::put`].
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().unwrap().put(key, value)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().unwrap().contains(key)
    }

    /// Removes an entry; see [`LruCache::remove`].
    pub fn remove(&self, key: &K) -> bool {
        self.inner.lock().unwrap().remove(key)
    }

    /// Removes an entry and transfers its value out; see
    /// [`LruCache::take`].
    pub fn take(&self, key: &K) -> Option<V> {
        self.inner.lock().unwrap().take(key)
    }

    /// Drops every entry without firing eviction hooks.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// A copy of the running statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().unwrap().stats()
    }

    /// Zeroes the statistics.
    pub fn reset_stats(&self) {
        self.inner.lock().unwrap().reset_stats()
    }

    /// Runs a closure with exclusive access to the underlying cache, for
    /// compound operations that must be atomic (for example registering an
    /// eviction hook or a check-then-insert sequence).
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        SharedLruCache {
            inner: self.inner.clone(),
        }
    }
}
