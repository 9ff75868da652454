//! Operation session: an owned [`LfuCache`] plus an audit trail of the calls
//! made against it.
//!
//! Each `put` captures two facts *before* the call mutates anything:
//!
//! - `key_existed`: the key was resident.
//! - `was_at_capacity`: the cache was full and the key was new, so this put
//!   is the one that evicts.
//!
//! A front end can narrate "updated", "inserted" and "evicted" from these
//! records without re-deriving them from before/after snapshots.
//!
//! ```
//! use lfukit::session::{OperationRecord, Session};
//!
//! let mut session = Session::new(1);
//! session.put(1, 10);
//! session.put(2, 20);
//! session.get(1);
//!
//! let evicting = &session.history()[1];
//! assert!(matches!(
//!     evicting,
//!     OperationRecord::Put { was_at_capacity: true, .. }
//! ));
//! assert_eq!(session.last().unwrap().to_string(), "GET (1) -> not found (-1)");
//! ```

use std::fmt;

use tracing::debug;

use crate::builder::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::policy::lfu::{LfuCache, PutOutcome};
use crate::traits::{CoreCache, MISS_SENTINEL};

/// One call made through a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationRecord {
    Put {
        key: i64,
        value: i64,
        key_existed: bool,
        was_at_capacity: bool,
        outcome: PutOutcome,
    },
    Get {
        key: i64,
        result: Option<i64>,
    },
}

impl OperationRecord {
    pub fn key(&self) -> i64 {
        match self {
            OperationRecord::Put { key, .. } | OperationRecord::Get { key, .. } => *key,
        }
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationRecord::Put { key, value, .. } => write!(f, "PUT ({}, {})", key, value),
            OperationRecord::Get {
                key,
                result: Some(value),
            } => write!(f, "GET ({}) -> {}", key, value),
            OperationRecord::Get { key, result: None } => {
                write!(f, "GET ({}) -> not found ({})", key, MISS_SENTINEL)
            },
        }
    }
}

/// Owns a cache and records every `get`/`put` issued through it.
#[derive(Debug)]
pub struct Session {
    cache: LfuCache,
    history: Vec<OperationRecord>,
}

impl Session {
    pub fn new(capacity: usize) -> Self {
        Self::with_cache(LfuCache::new(capacity))
    }

    /// Wraps an existing cache; its current contents are kept.
    pub fn with_cache(cache: LfuCache) -> Self {
        Self {
            cache,
            history: Vec::new(),
        }
    }

    pub fn put(&mut self, key: i64, value: i64) -> PutOutcome {
        let key_existed = self.cache.contains(key);
        let was_at_capacity = self.cache.len() >= self.cache.capacity() && !key_existed;
        let outcome = self.cache.put(key, value);
        self.history.push(OperationRecord::Put {
            key,
            value,
            key_existed,
            was_at_capacity,
            outcome,
        });
        outcome
    }

    pub fn get(&mut self, key: i64) -> Option<i64> {
        let result = self.cache.get(key);
        self.history.push(OperationRecord::Get { key, result });
        result
    }

    pub fn last(&self) -> Option<&OperationRecord> {
        self.history.last()
    }

    pub fn history(&self) -> &[OperationRecord] {
        &self.history
    }

    pub fn cache(&self) -> &LfuCache {
        &self.cache
    }

    /// Empties the cache at its current capacity and forgets the history.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.history.clear();
        debug!(capacity = self.cache.capacity(), "session reset");
    }

    /// Replaces the cache with an empty one of `capacity` and forgets the
    /// history.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.cache.recapacitate(capacity);
        self.history.clear();
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for a negative capacity; the session is left
    /// untouched.
    pub fn try_set_capacity(&mut self, capacity: i64) -> Result<(), ConfigError> {
        self.cache.try_recapacitate(capacity)?;
        self.history.clear();
        Ok(())
    }

    pub fn into_cache(self) -> LfuCache {
        self.cache
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
