//! # LRU Cache
//!
//! A generic capacity-bounded key→value store with O(1) operations and an
//! eviction-notification hook. In this crate it holds unloaded chunks
//! keyed by chunk coordinate, but the structure is domain-agnostic.
//!
//! ## Structure
//!
//! The recency list is intrusive: entries live in an index-stable arena
//! (a vector of slots with free-list reuse) and carry prev/next slot
//! indices, while a hash map takes keys to slot indices. Every operation
//! is O(1) amortized regardless of occupancy; there is no linear scan
//! anywhere.
//!
//! ## Eviction semantics
//!
//! Only capacity-driven eviction fires the eviction hook and counts
//! toward the eviction statistic. Explicit [`remove`](LruCache::remove),
//! [`take`](LruCache::take), and [`clear`](LruCache::clear) are not
//! evictions: the caller asked for them and gets no notification.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

pub mod shared;

pub use shared::SharedLruCache;

/// Sentinel index meaning "no slot".
const NIL: usize = usize::MAX;

/// Running cache statistics.
///
/// All four counters reset together via [`reset`](CacheStats::reset),
/// independently of the cache contents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found their key.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Capacity-driven evictions.
    pub evictions: u64,
    /// Successful insertions (including overwrites).
    pub insertions: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit: `hits / (hits + misses)`, or zero
    /// before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Zeroes all four counters.
    pub fn reset(&mut self) {
        *self = CacheStats::default();
    }
}

type EvictionHook<K, V> = Box<dyn FnMut(&K, &V) + Send>;

struct Slot<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// A capacity-bounded associative store with least-recently-used eviction.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use voxel_terrain::cache::LruCache;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// // "b" is now least recently used and gets evicted:
/// assert_eq!(cache.put("c", 3), Some(2));
/// assert!(cache.contains(&"a"));
/// ```
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    map: HashMap<K, usize>,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    stats: CacheStats,
    eviction_hook: Option<EvictionHook<K, V>>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates an empty cache that holds at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruCache {
            capacity,
            map: HashMap::with_capacity(capacity.get()),
            slots: Vec::with_capacity(capacity.get()),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            stats: CacheStats::default(),
            eviction_hook: None,
        }
    }

    /// Registers a hook invoked with the evicted key and value on every
    /// capacity-driven eviction, before the entry is discarded.
    pub fn set_eviction_hook(&mut self, hook: impl FnMut(&K, &V) + Send + 'static) {
        self.eviction_hook = Some(Box::new(hook));
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a key, marking the entry most recently used on a hit.
    ///
    /// A miss counts toward the miss statistic and changes nothing else:
    /// no allocation, no reordering.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.detach(idx);
                self.push_front(idx);
                self.stats.hits += 1;
                self.slots[idx].as_ref().map(|slot| &slot.value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Inserts or overwrites an entry, evicting the least recently used
    /// entry if the cache is full and the key is new.
    ///
    /// # Returns
    /// The displaced value, if any: the previous value for an overwritten
    /// key, or the evicted value for a capacity eviction. Returning it lets
    /// the caller release associated native resources synchronously. The
    /// eviction hook and counter fire only for the capacity-eviction case.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(idx) = self.map.get(&key).copied() {
            let slot = self.slots[idx].as_mut().unwrap();
            let old = std::mem::replace(&mut slot.value, value);
            self.detach(idx);
            self.push_front(idx);
            self.stats.insertions += 1;
            return Some(old);
        }

        let evicted = if self.map.len() == self.capacity.get() {
            self.evict_lru()
        } else {
            None
        };

        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        self.slots[idx] = Some(Slot {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        });
        self.map.insert(key, idx);
        self.push_front(idx);
        self.stats.insertions += 1;
        evicted
    }

    /// Whether a key is present. Does not affect recency order or
    /// statistics.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Removes an entry without invoking the eviction hook or counting an
    /// eviction (explicit removal is not capacity-driven eviction).
    ///
    /// # Returns
    /// Whether the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.take_slot(key).is_some()
    }

    /// Removes an entry and transfers its value to the caller.
    ///
    /// Counts a hit or miss like [`get`](LruCache::get), but like
    /// [`remove`](LruCache::remove) it is not an eviction: no hook, no
    /// eviction count. This is the ownership-transfer path the chunk
    /// lifecycle uses to reactivate a cached chunk.
    pub fn take(&mut self, key: &K) -> Option<V> {
        match self.take_slot(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Drops every entry without invoking eviction hooks (bulk teardown is
    /// not per-entry eviction). Statistics are unaffected.
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// A copy of the running statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Zeroes the statistics, leaving the contents untouched.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Evicts the least recently used entry: fires the hook, counts the
    /// eviction, and returns the value.
    fn evict_lru(&mut self) -> Option<V> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }
        self.detach(idx);
        let slot = self.slots[idx].take().unwrap();
        self.free.push(idx);
        self.map.remove(&slot.key);
        if let Some(hook) = self.eviction_hook.as_mut() {
            hook(&slot.key, &slot.value);
        }
        self.stats.evictions += 1;
        Some(slot.value)
    }

    /// Unlinks and frees a key's slot, returning its value.
    fn take_slot(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.detach(idx);
        let slot = self.slots[idx].take().unwrap();
        self.free.push(idx);
        Some(slot.value)
    }

    /// Unlinks a slot from the recency list.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = self.slots[idx].as_ref().unwrap();
            (slot.prev, slot.next)
        };
        match prev {
            NIL => self.head = next,
            p => self.slots[p].as_mut().unwrap().next = next,
        }
        match next {
            NIL => self.tail = prev,
            n => self.slots[n].as_mut().unwrap().prev = prev,
        }
        let slot = self.slots[idx].as_mut().unwrap();
        slot.prev = NIL;
        slot.next = NIL;
    }

    /// Links a detached slot in as the most recently used entry.
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let slot = self.slots[idx].as_mut().unwrap();
            slot.prev = NIL;
            slot.next = old_head;
        }
        if old_head != NIL {
            self.slots[old_head].as_mut().unwrap().prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity.get())
            .field("stats", &self.stats)
            .finish()
    }
}
