//! # LFU (Least Frequently Used) Cache Engine
//!
//! Fixed-capacity `i64 → i64` store that evicts the least frequently accessed
//! entry when full, breaking frequency ties by recency (the least recently
//! touched entry among the least frequently used goes first). Every `get` and
//! `put` runs in amortized O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              LfuCache Layout                                │
//! │                                                                             │
//! │   ┌─────────────────────────────┐   ┌─────────────────────────────────┐     │
//! │   │ index: FxHashMap<i64,SlotId>│   │  entries: SlotArena<Entry>      │     │
//! │   │                             │   │                                 │     │
//! │   │   key 1 ──► id_0 ───────────┼───┼──► id_0 │ k=1 v=10 f=2 prev/next │     │
//! │   │   key 2 ──► id_1 ───────────┼───┼──► id_1 │ k=2 v=20 f=1 prev/next │     │
//! │   │   key 3 ──► id_2 ───────────┼───┼──► id_2 │ k=3 v=30 f=1 prev/next │     │
//! │   └─────────────────────────────┘   └─────────────────────────────────┘     │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐     │
//! │   │ buckets: FxHashMap<u64, Bucket>  (frequency → doubly-linked list)  │     │
//! │   │                                                                   │     │
//! │   │  min_freq = 1                                                     │     │
//! │   │       │                                                           │     │
//! │   │       ▼                                                           │     │
//! │   │  freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail                     │     │
//! │   │                     MRU          LRU (evicted first)              │     │
//! │   │  freq=2: head ──► [id_0] ◄── tail                                 │     │
//! │   └───────────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Promotion Flow (`get` hit, `put` on a resident key)
//!
//! ```text
//!   get(2):
//!     1. index lookup → id_1
//!     2. unlink id_1 from freq=1; drop the bucket if it is now empty
//!     3. if the dropped bucket was min_freq → min_freq += 1
//!     4. entry.freq = 2, push id_1 to the front of freq=2 (created on demand)
//!     5. return entry.value
//! ```
//!
//! ## Insert Flow (`put` on an absent key)
//!
//! ```text
//!   put(4, 40) with len == capacity:
//!     1. tail of bucket[min_freq] is the victim → unlink, drop from index
//!     2. min_freq = 1
//!     3. new entry freq=1 at the front of bucket[1]
//! ```
//!
//! `min_freq` only ever moves by the two rules above. An eviction can empty
//! the minimum bucket, but the insert that caused it immediately resets the
//! minimum to 1, so the value is never observed stale.
//!
//! ## Operations
//!
//! | Operation            | Time          | Notes                               |
//! |----------------------|---------------|-------------------------------------|
//! | `get`                | O(1)          | Promotes on hit, no-op on miss      |
//! | `put`                | O(1)          | Update promotes; insert may evict   |
//! | `peek` / `frequency` | O(1)          | Never promotes                      |
//! | `peek_lfu`           | O(1)          | Tail of the min-frequency bucket    |
//! | `snapshot_buckets`   | O(n + b log b)| Read-only, ascending frequency      |
//! | `stats`              | O(b log b)    | Read-only                           |
//! | `reset`              | O(n)          | Keeps capacity                      |
//! | `recapacitate`       | O(n)          | Drops every entry                   |
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::policy::lfu::{LfuCache, PutOutcome};
//! use lfukit::traits::{CacheIntrospect, CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(2);
//! cache.put(1, 1);
//! cache.put(2, 2);
//! assert_eq!(cache.get(1), Some(1));
//!
//! // 1 and 2 were both at freq=1, but 1 was touched since; 2 goes.
//! let outcome = cache.put(3, 3);
//! assert_eq!(outcome.evicted().map(|e| e.key), Some(2));
//! assert_eq!(cache.get(2), None);
//!
//! let snapshot = cache.snapshot_buckets();
//! assert_eq!(snapshot.get(1), Some(&[(3, 3)][..]));
//! assert_eq!(snapshot.get(2), Some(&[(1, 1)][..]));
//! assert_eq!(cache.min_freq(), Some(1));
//! ```
//!
//! ## Thread Safety
//!
//! [`LfuCache`] is single-threaded: every mutation needs `&mut self`, and a
//! `get` reorders buckets, so even reads are exclusive. Sharing a cache
//! across threads means one lock around the whole engine
//! (`Mutex<LfuCache>`); promotion and eviction touch the index, two buckets
//! and `min_freq` in several steps.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{ConfigError, InvariantError, checked_capacity};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CacheIntrospect, CoreCache, LfuCacheTrait};

/// Default bucket pre-allocation. Access counts cluster at low frequencies.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// Upper bound on up-front reservation; larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// Link fields first: they are touched on every promotion.
#[derive(Debug)]
#[repr(C)]
struct Entry {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: i64,
    value: i64,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

/// Entry removed to make room for an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictedEntry {
    pub key: i64,
    pub value: i64,
    /// Access count the entry had when it was evicted.
    pub freq: u64,
}

/// What a [`put`](CoreCache::put) did.
///
/// Callers that only need the plain store contract can ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// New key, free room.
    Inserted,
    /// Resident key; value replaced and frequency bumped.
    Updated { previous: i64 },
    /// New key at full capacity; the victim is attached.
    Evicted(EvictedEntry),
    /// Capacity is zero; nothing stored.
    Rejected,
}

impl PutOutcome {
    pub fn evicted(&self) -> Option<EvictedEntry> {
        match self {
            PutOutcome::Evicted(entry) => Some(*entry),
            _ => None,
        }
    }

    /// `true` if the key was absent and is now resident.
    pub fn inserted_new(&self) -> bool {
        matches!(self, PutOutcome::Inserted | PutOutcome::Evicted(_))
    }
}

/// One non-empty frequency group in a [`BucketSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyGroup {
    pub freq: u64,
    /// `(key, value)` from most- to least-recently touched.
    pub entries: Vec<(i64, i64)>,
}

/// Owned copy of every non-empty frequency group, ascending by frequency.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BucketSnapshot {
    groups: Vec<FrequencyGroup>,
}

impl BucketSnapshot {
    pub fn groups(&self) -> &[FrequencyGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyGroup> {
        self.groups.iter()
    }

    /// Members of the group at `freq`, or `None` if no entry has that count.
    pub fn get(&self, freq: u64) -> Option<&[(i64, i64)]> {
        self.groups
            .binary_search_by_key(&freq, |group| group.freq)
            .ok()
            .map(|idx| self.groups[idx].entries.as_slice())
    }

    /// Keys of the group at `freq`, most recent first. Empty if absent.
    pub fn keys_at(&self, freq: u64) -> Vec<i64> {
        self.get(freq)
            .map(|entries| entries.iter().map(|&(key, _)| key).collect())
            .unwrap_or_default()
    }

    /// Frequency the snapshot recorded for `key`.
    pub fn frequency_of(&self, key: i64) -> Option<u64> {
        self.groups
            .iter()
            .find(|group| group.entries.iter().any(|&(k, _)| k == key))
            .map(|group| group.freq)
    }

    /// Total number of entries across all groups.
    pub fn key_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a BucketSnapshot {
    type Item = &'a FrequencyGroup;
    type IntoIter = std::slice::Iter<'a, FrequencyGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Aggregate view of the cache for observers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub capacity: usize,
    pub len: usize,
    /// `None` while the cache is empty.
    pub min_freq: Option<u64>,
    pub key_index_len: usize,
    pub bucket_count: usize,
    /// `(freq, member count)` ascending by frequency, non-empty groups only.
    pub distribution: Vec<(u64, usize)>,
}

/// LFU cache with O(1) `get`/`put` and recency tie-breaking.
///
/// See the module-level documentation for the data layout.
#[derive(Debug)]
pub struct LfuCache {
    entries: SlotArena<Entry>,
    index: FxHashMap<i64, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    /// 0 means "no entries".
    min_freq: u64,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl LfuCache {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is allowed: every `put` is then a no-op.
    pub fn new(capacity: usize) -> Self {
        Self::with_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Creates an empty cache and pre-sizes the frequency map for
    /// `bucket_hint` distinct access counts.
    pub fn with_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);
        Self {
            entries: SlotArena::with_capacity(prealloc),
            index: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            buckets: FxHashMap::with_capacity_and_hasher(
                bucket_hint.min(MAX_PREALLOC),
                Default::default(),
            ),
            min_freq: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Fallible constructor for signed capacities.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use lfukit::policy::lfu::LfuCache;
    /// use lfukit::traits::CoreCache;
    ///
    /// let cache = LfuCache::try_new(3).unwrap();
    /// assert_eq!(cache.capacity(), 3);
    /// assert!(LfuCache::try_new(-1).is_err());
    /// ```
    pub fn try_new(capacity: i64) -> Result<Self, ConfigError> {
        Ok(Self::new(checked_capacity(capacity)?))
    }

    /// Value for `key` without counting an access.
    pub fn peek(&self, key: i64) -> Option<i64> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let value = self
            .index
            .get(&key)
            .and_then(|&id| self.entries.get(id))
            .map(|entry| entry.value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            (&self.metrics).record_peek_found();
        }

        value
    }

    /// Iterates `(key, value)` of the group at `freq`, most recent first.
    pub fn iter_bucket(&self, freq: u64) -> BucketIter<'_> {
        BucketIter {
            entries: &self.entries,
            current: self.buckets.get(&freq).and_then(|bucket| bucket.head),
        }
    }

    /// Drops every entry and keeps the capacity.
    ///
    /// Equivalent to constructing a fresh cache with the same capacity.
    pub fn reset(&mut self) {
        let dropped = self.entries.len();
        self.clear_state();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        debug!(capacity = self.capacity, dropped, "lfu cache reset");
    }

    /// Drops every entry and adopts `capacity`.
    ///
    /// No entries survive, even when the new capacity is larger.
    pub fn recapacitate(&mut self, capacity: usize) {
        let previous = self.capacity;
        let dropped = self.entries.len();
        self.clear_state();
        self.capacity = capacity;
        let prealloc = capacity.min(MAX_PREALLOC);
        self.entries.reserve(prealloc);
        self.index.reserve(prealloc);
        #[cfg(feature = "metrics")]
        self.metrics.record_recapacitate();
        debug!(previous, capacity, dropped, "lfu cache recapacitated");
    }

    /// Signed variant of [`recapacitate`](Self::recapacitate).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is negative; the cache is left
    /// untouched in that case.
    pub fn try_recapacitate(&mut self, capacity: i64) -> Result<(), ConfigError> {
        let capacity = checked_capacity(capacity)?;
        self.recapacitate(capacity);
        Ok(())
    }

    /// Walks every bucket and cross-checks it against the key index.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] naming the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        if self.entries.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} entries but index holds {}",
                self.entries.len(),
                self.index.len()
            )));
        }

        if self.entries.is_empty() {
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("empty cache retains buckets"));
            }
            if self.min_freq != 0 {
                return Err(InvariantError::new(format!(
                    "empty cache reports min_freq {}",
                    self.min_freq
                )));
            }
            return Ok(());
        }

        match self.buckets.get(&self.min_freq) {
            Some(bucket) if bucket.len > 0 => {},
            _ => {
                return Err(InvariantError::new(format!(
                    "min_freq {} has no members",
                    self.min_freq
                )));
            },
        }

        let mut total = 0usize;
        for (&freq, bucket) in &self.buckets {
            if freq < self.min_freq {
                return Err(InvariantError::new(format!(
                    "bucket {} sits below min_freq {}",
                    freq, self.min_freq
                )));
            }
            if bucket.len == 0 {
                return Err(InvariantError::new(format!("bucket {} is empty", freq)));
            }

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = current {
                if count > self.entries.len() {
                    return Err(InvariantError::new(format!("bucket {} has a cycle", freq)));
                }
                let entry = self.entries.get(id).ok_or_else(|| {
                    InvariantError::new(format!("bucket {} links a vacant slot", freq))
                })?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "key {} has freq {} but sits in bucket {}",
                        entry.key, entry.freq, freq
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new(format!(
                        "key {} has a broken prev link",
                        entry.key
                    )));
                }
                if self.index.get(&entry.key) != Some(&id) {
                    return Err(InvariantError::new(format!(
                        "key {} is not indexed at its slot",
                        entry.key
                    )));
                }
                last = Some(id);
                current = entry.next;
                count += 1;
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!("bucket {} has a stale tail", freq)));
            }
            if bucket.len != count {
                return Err(InvariantError::new(format!(
                    "bucket {} records {} members but links {}",
                    freq, bucket.len, count
                )));
            }
            total += count;
        }

        if total != self.index.len() {
            return Err(InvariantError::new(format!(
                "buckets hold {} members but index holds {}",
                total,
                self.index.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lfu invariant violated: {}", err);
        }
    }

    fn clear_state(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    fn current_min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Moves `id` up one frequency and to the front of its new group.
    fn promote(&mut self, id: SlotId) -> Option<u64> {
        let freq = self.entries.get(id)?.freq;
        if freq == u64::MAX {
            // Saturated: refresh recency only.
            self.list_unlink(freq, id)?;
            self.list_push_front(freq, id);
            return Some(freq);
        }

        let emptied = self.list_unlink(freq, id)?;
        if emptied && self.min_freq == freq {
            self.min_freq = freq + 1;
        }

        let next = freq + 1;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next;
        }
        self.list_push_front(next, id);

        #[cfg(feature = "metrics")]
        self.metrics.record_promotion();

        Some(next)
    }

    /// Removes the tail of the `min_freq` bucket.
    ///
    /// Leaves `min_freq` stale when the bucket empties; only called right
    /// before an insert that resets it.
    fn evict_min(&mut self) -> Option<EvictedEntry> {
        let freq = self.min_freq;
        let id = self.buckets.get(&freq)?.tail?;
        self.list_unlink(freq, id)?;
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        debug!(
            key = entry.key,
            value = entry.value,
            freq = entry.freq,
            "lfu evicted least frequently used entry"
        );

        Some(EvictedEntry {
            key: entry.key,
            value: entry.value,
            freq: entry.freq,
        })
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let bucket = self.buckets.entry(freq).or_default();
        let old_head = bucket.head;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(head) => {
                if let Some(entry) = self.entries.get_mut(head) {
                    entry.prev = Some(id);
                }
            },
            None => bucket.tail = Some(id),
        }
        bucket.head = Some(id);
        bucket.len += 1;
    }

    /// Unlinks `id` from bucket `freq`. Returns `true` if the bucket emptied
    /// and was dropped.
    fn list_unlink(&mut self, freq: u64, id: SlotId) -> Option<bool> {
        let (prev, next) = {
            let entry = self.entries.get(id)?;
            (entry.prev, entry.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        match prev {
            Some(prev) => {
                if let Some(entry) = self.entries.get_mut(prev) {
                    entry.next = next;
                }
            },
            None => bucket.head = next,
        }
        match next {
            Some(next) => {
                if let Some(entry) = self.entries.get_mut(next) {
                    entry.prev = prev;
                }
            },
            None => bucket.tail = prev,
        }
        bucket.len = bucket.len.saturating_sub(1);
        let emptied = bucket.len == 0;

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
        if emptied {
            self.buckets.remove(&freq);
        }
        Some(emptied)
    }
}

impl CoreCache for LfuCache {
    fn get(&mut self, key: i64) -> Option<i64> {
        let Some(&id) = self.index.get(&key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            trace!(key, "lfu get miss");
            return None;
        };

        let freq = self.promote(id)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        trace!(key, freq, "lfu get hit");

        self.entries.get(id).map(|entry| entry.value)
    }

    fn put(&mut self, key: i64, value: i64) -> PutOutcome {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_rejected();
            trace!(key, "lfu put ignored, capacity is zero");
            return PutOutcome::Rejected;
        }

        if let Some(&id) = self.index.get(&key)
            && let Some(entry) = self.entries.get_mut(id)
        {
            let previous = std::mem::replace(&mut entry.value, value);
            let freq = self.promote(id);

            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            trace!(key, value, previous, freq, "lfu put updated resident key");

            return PutOutcome::Updated { previous };
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let evicted = if self.index.len() >= self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();
            self.evict_min()
        } else {
            None
        };

        self.min_freq = 1;
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key,
            value,
        });
        self.index.insert(key, id);
        self.list_push_front(1, id);
        trace!(key, value, "lfu put inserted new key");

        match evicted {
            Some(entry) => PutOutcome::Evicted(entry),
            None => PutOutcome::Inserted,
        }
    }

    fn contains(&self, key: i64) -> bool {
        self.index.contains_key(&key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.reset();
    }
}

impl LfuCacheTrait for LfuCache {
    fn frequency(&self, key: i64) -> Option<u64> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_frequency_call();

        let freq = self
            .index
            .get(&key)
            .and_then(|&id| self.entries.get(id))
            .map(|entry| entry.freq);

        #[cfg(feature = "metrics")]
        if freq.is_some() {
            (&self.metrics).record_frequency_found();
        }

        freq
    }

    fn peek_lfu(&self) -> Option<(i64, i64)> {
        let id = self.buckets.get(&self.min_freq)?.tail?;
        let entry = self.entries.get(id)?;
        Some((entry.key, entry.value))
    }

    fn min_freq(&self) -> Option<u64> {
        self.current_min_freq()
    }
}

impl CacheIntrospect for LfuCache {
    fn snapshot_buckets(&self) -> BucketSnapshot {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_snapshot_call();

        let mut freqs: Vec<u64> = self
            .buckets
            .iter()
            .filter(|(_, bucket)| bucket.len > 0)
            .map(|(&freq, _)| freq)
            .collect();
        freqs.sort_unstable();

        let groups = freqs
            .into_iter()
            .map(|freq| FrequencyGroup {
                freq,
                entries: self.iter_bucket(freq).collect(),
            })
            .collect();
        BucketSnapshot { groups }
    }

    fn stats(&self) -> CacheStats {
        let mut distribution: Vec<(u64, usize)> = self
            .buckets
            .iter()
            .filter(|(_, bucket)| bucket.len > 0)
            .map(|(&freq, bucket)| (freq, bucket.len))
            .collect();
        distribution.sort_unstable_by_key(|&(freq, _)| freq);

        CacheStats {
            capacity: self.capacity,
            len: self.entries.len(),
            min_freq: self.current_min_freq(),
            key_index_len: self.index.len(),
            bucket_count: self.buckets.len(),
            distribution,
        }
    }
}

/// Iterator over one frequency group, most recent first.
#[derive(Debug)]
pub struct BucketIter<'a> {
    entries: &'a SlotArena<Entry>,
    current: Option<SlotId>,
}

impl Iterator for BucketIter<'_> {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.current?)?;
        self.current = entry.next;
        Some((entry.key, entry.value))
    }
}

#[cfg(feature = "metrics")]
impl LfuCache {
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            insert_rejected: self.metrics.insert_rejected,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            promotions: self.metrics.promotions,
            clear_calls: self.metrics.clear_calls,
            recapacitate_calls: self.metrics.recapacitate_calls,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            frequency_found: self.metrics.frequency_found.get(),
            snapshot_calls: self.metrics.snapshot_calls.get(),
            cache_len: self.entries.len(),
            capacity: self.capacity,
            bucket_count: self.buckets.len(),
            min_freq: self.min_freq,
        }
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache {
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, keys: &[i64]) -> LfuCache {
        let mut cache = LfuCache::new(capacity);
        for &key in keys {
            cache.put(key, key * 10);
        }
        cache
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn get_returns_value_and_promotes() {
            let mut cache = filled(3, &[1, 2]);
            assert_eq!(cache.get(1), Some(10));
            assert_eq!(cache.frequency(1), Some(2));
            assert_eq!(cache.frequency(2), Some(1));
            cache.debug_validate_invariants();
        }

        #[test]
        fn repeated_get_increments_by_one() {
            let mut cache = LfuCache::new(3);
            cache.put(1, 1);
            assert_eq!(cache.frequency(1), Some(1));
            cache.get(1);
            assert_eq!(cache.frequency(1), Some(2));
            cache.get(1);
            assert_eq!(cache.frequency(1), Some(3));
        }

        #[test]
        fn miss_returns_none_and_sentinel() {
            let mut cache = filled(2, &[1]);
            assert_eq!(cache.get(99), None);
            assert_eq!(cache.get_or_sentinel(99), crate::traits::MISS_SENTINEL);
            assert_eq!(cache.get_or_sentinel(1), 10);
        }

        #[test]
        fn put_existing_updates_value_and_counts_access() {
            let mut cache = filled(2, &[1, 2]);
            let outcome = cache.put(1, 111);
            assert_eq!(outcome, PutOutcome::Updated { previous: 10 });
            assert_eq!(cache.peek(1), Some(111));
            assert_eq!(cache.frequency(1), Some(2));
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn put_existing_at_capacity_never_evicts() {
            let mut cache = filled(2, &[1, 2]);
            for v in 0..5 {
                assert!(matches!(cache.put(2, v), PutOutcome::Updated { .. }));
            }
            assert!(cache.contains(1));
            assert!(cache.contains(2));
            assert_eq!(cache.frequency(2), Some(6));
        }

        #[test]
        fn insert_reports_inserted_until_full() {
            let mut cache = LfuCache::new(2);
            assert_eq!(cache.put(1, 1), PutOutcome::Inserted);
            assert_eq!(cache.put(2, 2), PutOutcome::Inserted);
            assert!(cache.put(3, 3).evicted().is_some());
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn zero_capacity_rejects_everything() {
            let mut cache = LfuCache::new(0);
            for key in 0..10 {
                assert_eq!(cache.put(key, key), PutOutcome::Rejected);
                assert_eq!(cache.len(), 0);
                assert_eq!(cache.get(key), None);
            }
            assert_eq!(cache.min_freq(), None);
            cache.debug_validate_invariants();
        }

        #[test]
        fn single_capacity_replaces_on_insert() {
            let mut cache = LfuCache::new(1);
            cache.put(1, 1);
            cache.get(1);
            cache.get(1);
            let outcome = cache.put(2, 2);
            assert_eq!(
                outcome,
                PutOutcome::Evicted(EvictedEntry {
                    key: 1,
                    value: 1,
                    freq: 3,
                })
            );
            assert_eq!(cache.min_freq(), Some(1));
            assert_eq!(cache.get(1), None);
            assert_eq!(cache.get(2), Some(2));
        }

        #[test]
        fn negative_and_extreme_keys_are_ordinary() {
            let mut cache = LfuCache::new(3);
            cache.put(i64::MIN, -1);
            cache.put(-1, i64::MAX);
            cache.put(i64::MAX, 0);
            assert_eq!(cache.get(i64::MIN), Some(-1));
            assert_eq!(cache.get(-1), Some(i64::MAX));
            assert_eq!(cache.get(i64::MAX), Some(0));
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn evicts_lowest_frequency() {
            let mut cache = filled(3, &[1, 2, 3]);
            cache.get(2);
            cache.get(2);
            cache.get(3);
            let outcome = cache.put(4, 40);
            assert_eq!(outcome.evicted().map(|e| e.key), Some(1));
            assert!(cache.contains(2));
            assert!(cache.contains(3));
            assert!(cache.contains(4));
        }

        #[test]
        fn tie_break_evicts_least_recently_touched() {
            let mut cache = filled(3, &[1, 2, 3]);
            // all at freq=1; insertion order is the touch order
            assert_eq!(cache.peek_lfu(), Some((1, 10)));
            assert_eq!(cache.put(4, 40).evicted().map(|e| e.key), Some(1));
            assert_eq!(cache.put(5, 50).evicted().map(|e| e.key), Some(2));
        }

        #[test]
        fn promoted_entries_are_touched_more_recently() {
            let mut cache = filled(3, &[1, 2, 3]);
            cache.get(1);
            cache.get(2);
            cache.get(3);
            // all at freq=2 now, 1 was promoted first
            assert_eq!(cache.peek_lfu(), Some((1, 10)));
            cache.get(1);
            assert_eq!(cache.peek_lfu(), Some((2, 20)));
        }

        #[test]
        fn never_evicts_higher_frequency_while_lower_exists() {
            let mut cache = filled(4, &[1, 2, 3, 4]);
            for key in [1, 2, 3] {
                cache.get(key);
            }
            for next in 5..10 {
                let victim = cache.put(next, next).evicted().unwrap();
                assert_eq!(victim.freq, 1);
                assert!(![1, 2, 3].contains(&victim.key));
            }
        }

        #[test]
        fn min_freq_advances_when_group_drains() {
            let mut cache = filled(2, &[1, 2]);
            cache.get(1);
            assert_eq!(cache.min_freq(), Some(1));
            cache.get(2);
            assert_eq!(cache.min_freq(), Some(2));
            cache.get(2);
            assert_eq!(cache.min_freq(), Some(2));
            cache.get(1);
            assert_eq!(cache.min_freq(), Some(3));
            cache.debug_validate_invariants();
        }

        #[test]
        fn insert_after_eviction_resets_min_freq() {
            let mut cache = filled(1, &[1]);
            cache.get(1);
            cache.get(1);
            assert_eq!(cache.min_freq(), Some(3));
            cache.put(2, 2);
            assert_eq!(cache.min_freq(), Some(1));
            cache.debug_validate_invariants();
        }
    }

    mod scenarios {
        use super::*;

        #[test]
        fn capacity_two_walkthrough() {
            let mut cache = LfuCache::new(2);
            cache.put(1, 1);
            cache.put(2, 2);
            assert_eq!(cache.get(1), Some(1));
            let outcome = cache.put(3, 3);
            assert_eq!(
                outcome.evicted(),
                Some(EvictedEntry {
                    key: 2,
                    value: 2,
                    freq: 1
                })
            );

            let snapshot = cache.snapshot_buckets();
            assert_eq!(snapshot.get(1), Some(&[(3, 3)][..]));
            assert_eq!(snapshot.get(2), Some(&[(1, 1)][..]));
            assert_eq!(snapshot.groups().len(), 2);
            assert_eq!(cache.get_or_sentinel(2), -1);
        }

        #[test]
        fn capacity_three_walkthrough() {
            let mut cache = LfuCache::new(3);
            cache.put(1, 1);
            cache.put(2, 2);
            cache.get(1);
            cache.put(3, 3);
            cache.get(2);
            let outcome = cache.put(4, 4);
            assert_eq!(outcome.evicted().map(|e| e.key), Some(3));

            assert_eq!(cache.frequency(1), Some(2));
            assert_eq!(cache.frequency(2), Some(2));
            assert_eq!(cache.frequency(4), Some(1));
            assert!(!cache.contains(3));

            let snapshot = cache.snapshot_buckets();
            assert_eq!(snapshot.keys_at(2), vec![2, 1]);
            assert_eq!(snapshot.keys_at(1), vec![4]);
        }
    }

    mod introspection {
        use super::*;

        #[test]
        fn snapshot_is_ascending_and_mru_first() {
            let mut cache = filled(5, &[1, 2, 3, 4, 5]);
            cache.get(4);
            cache.get(2);
            cache.get(2);
            let snapshot = cache.snapshot_buckets();
            let freqs: Vec<u64> = snapshot.iter().map(|g| g.freq).collect();
            assert_eq!(freqs, vec![1, 2, 3]);
            assert_eq!(snapshot.keys_at(1), vec![5, 3, 1]);
            assert_eq!(snapshot.keys_at(2), vec![4]);
            assert_eq!(snapshot.keys_at(3), vec![2]);
            assert_eq!(snapshot.frequency_of(2), Some(3));
            assert_eq!(snapshot.frequency_of(42), None);
            assert_eq!(snapshot.key_count(), 5);
        }

        #[test]
        fn introspection_does_not_mutate() {
            let mut cache = filled(3, &[1, 2, 3]);
            cache.get(2);
            let before = cache.snapshot_buckets();
            let stats_before = cache.stats();

            let _ = cache.peek(1);
            let _ = cache.frequency(3);
            let _ = cache.peek_lfu();
            let _ = cache.contains(2);
            let _ = cache.stats();

            assert_eq!(cache.snapshot_buckets(), before);
            assert_eq!(cache.stats(), stats_before);
        }

        #[test]
        fn stats_reports_distribution() {
            let mut cache = filled(4, &[1, 2, 3]);
            cache.get(1);
            cache.get(1);
            cache.get(2);
            let stats = cache.stats();
            assert_eq!(stats.capacity, 4);
            assert_eq!(stats.len, 3);
            assert_eq!(stats.key_index_len, 3);
            assert_eq!(stats.min_freq, Some(1));
            assert_eq!(stats.bucket_count, 3);
            assert_eq!(stats.distribution, vec![(1, 1), (2, 1), (3, 1)]);
        }

        #[test]
        fn empty_cache_views() {
            let cache = LfuCache::new(3);
            assert!(cache.snapshot_buckets().is_empty());
            let stats = cache.stats();
            assert_eq!(stats.len, 0);
            assert_eq!(stats.min_freq, None);
            assert!(stats.distribution.is_empty());
            assert_eq!(cache.peek_lfu(), None);
        }

        #[test]
        fn iter_bucket_missing_frequency_is_empty() {
            let cache = filled(2, &[1]);
            assert_eq!(cache.iter_bucket(7).count(), 0);
            assert_eq!(cache.iter_bucket(1).collect::<Vec<_>>(), vec![(1, 10)]);
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn reset_keeps_capacity() {
            let mut cache = filled(3, &[1, 2, 3]);
            cache.get(1);
            cache.reset();
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.min_freq(), None);
            assert!(cache.snapshot_buckets().is_empty());
            cache.debug_validate_invariants();

            cache.put(9, 9);
            assert_eq!(cache.frequency(9), Some(1));
        }

        #[test]
        fn clear_is_reset() {
            let mut cache = filled(2, &[1, 2]);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 2);
        }

        #[test]
        fn recapacitate_drops_all_entries() {
            let mut cache = filled(3, &[1, 2, 3]);
            cache.recapacitate(5);
            assert_eq!(cache.capacity(), 5);
            assert!(cache.is_empty());

            cache.recapacitate(1);
            cache.put(1, 1);
            cache.put(2, 2);
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(2));
            cache.debug_validate_invariants();
        }

        #[test]
        fn try_recapacitate_rejects_negative_without_touching_state() {
            let mut cache = filled(3, &[1, 2]);
            let err = cache.try_recapacitate(-2).unwrap_err();
            assert!(err.message().contains("-2"));
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.len(), 2);

            cache.try_recapacitate(0).unwrap();
            assert_eq!(cache.capacity(), 0);
            assert!(cache.is_empty());
        }

        #[test]
        fn try_new_validates_capacity() {
            assert!(LfuCache::try_new(0).is_ok());
            assert_eq!(LfuCache::try_new(7).unwrap().capacity(), 7);
            assert!(LfuCache::try_new(i64::MIN).is_err());
        }

        #[test]
        fn huge_capacity_does_not_preallocate() {
            let mut cache = LfuCache::new(usize::MAX);
            cache.put(1, 1);
            assert_eq!(cache.capacity(), usize::MAX);
            assert_eq!(cache.len(), 1);
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn invariants_hold_through_mixed_workload() {
            let mut cache = LfuCache::new(4);
            cache.debug_validate_invariants();
            for i in 0..200i64 {
                match i % 5 {
                    0 | 3 => {
                        cache.put(i % 9, i);
                    },
                    1 => {
                        cache.get(i % 7);
                    },
                    2 => {
                        cache.get(i % 3);
                    },
                    _ => {
                        cache.put(i % 4, -i);
                    },
                }
                cache.debug_validate_invariants();
                assert!(cache.len() <= cache.capacity());
            }
        }

        #[test]
        fn saturated_frequency_only_refreshes_recency() {
            let mut cache = filled(2, &[1, 2]);
            let id = cache.index[&1];
            // jump key 1 straight to the ceiling
            cache.list_unlink(1, id);
            cache.entries.get_mut(id).unwrap().freq = u64::MAX;
            cache.list_push_front(u64::MAX, id);

            assert_eq!(cache.get(1), Some(10));
            assert_eq!(cache.frequency(1), Some(u64::MAX));
            cache.debug_validate_invariants();
        }

        #[test]
        fn cache_can_move_behind_a_lock() {
            fn assert_send<T: Send>() {}
            assert_send::<LfuCache>();

            let shared = std::sync::Mutex::new(filled(2, &[1]));
            let got = std::thread::scope(|scope| {
                scope
                    .spawn(|| shared.lock().unwrap().get(1))
                    .join()
                    .unwrap()
            });
            assert_eq!(got, Some(10));
        }

        #[test]
        fn check_invariants_reports_corruption() {
            let mut cache = filled(2, &[1, 2]);
            let id = cache.index[&2];
            cache.entries.get_mut(id).unwrap().freq = 5;
            let err = cache.check_invariants().unwrap_err();
            assert!(err.message().contains("key 2"));
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_track_operations() {
            let mut cache = LfuCache::new(2);
            cache.put(1, 1);
            cache.put(2, 2);
            cache.put(1, 11);
            cache.get(1);
            cache.get(9);
            cache.put(3, 3);
            let _ = cache.peek(3);
            let _ = cache.frequency(3);
            let _ = cache.snapshot_buckets();

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.evict_calls, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.promotions, 2);
            assert_eq!(snap.peek_found, 1);
            assert_eq!(snap.frequency_found, 1);
            assert_eq!(snap.snapshot_calls, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }

        #[test]
        fn rejected_puts_are_counted() {
            let mut cache = LfuCache::new(0);
            cache.put(1, 1);
            assert_eq!(cache.snapshot().insert_rejected, 1);
        }
    }
}
