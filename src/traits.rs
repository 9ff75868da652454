//! # Cache Trait Hierarchy
//!
//! Trait seams between the LFU engine and whoever drives or observes it.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │              CoreCache                  │
//!   │                                         │
//!   │  get(&mut, i64) → Option<i64>           │
//!   │  get_or_sentinel(&mut, i64) → i64       │
//!   │  put(&mut, i64, i64) → PutOutcome       │
//!   │  contains / len / is_empty / capacity   │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │            LfuCacheTrait                │
//!   │                                         │
//!   │  frequency(&, i64) → Option<u64>        │
//!   │  peek_lfu(&) → Option<(i64, i64)>       │
//!   │  min_freq(&) → Option<u64>              │
//!   └─────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────┐
//!   │           CacheIntrospect               │
//!   │  snapshot_buckets(&) → BucketSnapshot   │
//!   │  stats(&) → CacheStats                  │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! `CoreCache::get` and `CoreCache::put` mutate recency and frequency.
//! Everything on `LfuCacheTrait` and `CacheIntrospect` is read-only and must
//! never reorder buckets or change any frequency.
//!
//! ## Example
//!
//! ```
//! use lfukit::policy::lfu::LfuCache;
//! use lfukit::traits::{CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(2);
//! cache.put(1, 10);
//! cache.put(2, 20);
//! cache.get(1);
//!
//! assert_eq!(cache.frequency(1), Some(2));
//! assert_eq!(cache.peek_lfu(), Some((2, 20)));
//! ```

use crate::policy::lfu::{BucketSnapshot, CacheStats, PutOutcome};

/// Value returned by [`CoreCache::get_or_sentinel`] on a miss.
pub const MISS_SENTINEL: i64 = -1;

/// Operations every integer cache supports.
pub trait CoreCache {
    /// Returns the value for `key` and records an access, or `None` on a miss.
    ///
    /// A miss never mutates the cache.
    fn get(&mut self, key: i64) -> Option<i64>;

    /// Like [`get`](Self::get) but reports a miss as [`MISS_SENTINEL`].
    ///
    /// A resident value equal to the sentinel is indistinguishable from a
    /// miss through this method; use [`get`](Self::get) when that matters.
    fn get_or_sentinel(&mut self, key: i64) -> i64 {
        self.get(key).unwrap_or(MISS_SENTINEL)
    }

    /// Inserts or updates `key`. Updating counts as an access.
    fn put(&mut self, key: i64, value: i64) -> PutOutcome;

    /// `true` if `key` is resident. Does not count as an access.
    fn contains(&self, key: i64) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Drops every entry, keeping the capacity.
    fn clear(&mut self);
}

/// Frequency-aware queries for LFU caches.
pub trait LfuCacheTrait: CoreCache {
    /// Current access count of `key`, if resident.
    fn frequency(&self, key: i64) -> Option<u64>;

    /// The entry that would be evicted by the next insert at full capacity.
    fn peek_lfu(&self) -> Option<(i64, i64)>;

    /// Smallest frequency among resident entries; `None` when empty.
    fn min_freq(&self) -> Option<u64>;
}

/// Read-only views for observers such as visualizers and audit logs.
pub trait CacheIntrospect {
    /// Every non-empty frequency group, ascending by frequency, members from
    /// most- to least-recently touched.
    fn snapshot_buckets(&self) -> BucketSnapshot;

    /// Aggregate counters and the frequency distribution.
    fn stats(&self) -> CacheStats;
}
