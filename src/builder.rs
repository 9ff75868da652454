//! Builder for [`LfuCache`] instances.
//!
//! Collects capacity and pre-allocation hints, validates them once, and hands
//! back a ready engine. Signed capacities (form input, CLI arguments) go
//! through [`LfuCacheBuilder::signed`] so that a negative value surfaces as a
//! [`ConfigError`] from [`try_build`](LfuCacheBuilder::try_build) instead of
//! wrapping around.
//!
//! ## Example
//!
//! ```rust
//! use lfukit::builder::LfuCacheBuilder;
//! use lfukit::traits::CoreCache;
//!
//! let mut cache = LfuCacheBuilder::new(100).bucket_hint(8).build();
//! cache.put(1, 10);
//! assert_eq!(cache.get(1), Some(10));
//!
//! assert!(LfuCacheBuilder::signed(-3).try_build().is_err());
//! ```

use crate::error::{ConfigError, checked_capacity};
use crate::policy::lfu::{DEFAULT_BUCKET_PREALLOC, LfuCache};

/// Capacity used when the caller does not pick one.
pub const DEFAULT_CAPACITY: usize = 3;

/// Builder for [`LfuCache`].
#[derive(Debug, Clone)]
pub struct LfuCacheBuilder {
    capacity: i64,
    bucket_hint: usize,
}

impl LfuCacheBuilder {
    /// Create a new builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: i64::try_from(capacity).unwrap_or(i64::MAX),
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Create a builder from a signed capacity; negatives fail at build time.
    pub fn signed(capacity: i64) -> Self {
        Self {
            capacity,
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Expected number of distinct access counts, used to pre-size the
    /// frequency map.
    pub fn bucket_hint(mut self, hint: usize) -> Self {
        self.bucket_hint = hint;
        self
    }

    /// Build the cache, panicking on invalid configuration.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is negative. Use
    /// [`try_build`](Self::try_build) to handle that case.
    pub fn build(self) -> LfuCache {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build the cache, returning an error on invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is negative.
    pub fn try_build(self) -> Result<LfuCache, ConfigError> {
        let capacity = checked_capacity(self.capacity)?;
        Ok(LfuCache::with_bucket_hint(capacity, self.bucket_hint))
    }
}

impl Default for LfuCacheBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
