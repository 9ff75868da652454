//! Error types for the lfukit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a capacity cannot be accepted (negative
//!   values coming from signed callers such as form input).
//! - [`InvariantError`]: Returned by [`LfuCache::check_invariants`] when the
//!   bucket structure disagrees with the key index.
//!
//! Cache misses and zero-capacity puts are not errors; they are ordinary
//! outcomes of [`CoreCache::get`] and [`CoreCache::put`].
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::error::ConfigError;
//! use lfukit::policy::lfu::LfuCache;
//!
//! let cache: Result<LfuCache, ConfigError> = LfuCache::try_new(3);
//! assert!(cache.is_ok());
//!
//! let bad = LfuCache::try_new(-1);
//! assert!(bad.is_err());
//! ```
//!
//! [`LfuCache::check_invariants`]: crate::policy::lfu::LfuCache::check_invariants
//! [`CoreCache::get`]: crate::traits::CoreCache::get
//! [`CoreCache::put`]: crate::traits::CoreCache::put

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new),
/// [`LfuCache::try_recapacitate`](crate::policy::lfu::LfuCache::try_recapacitate)
/// and [`LfuCacheBuilder::try_build`](crate::builder::LfuCacheBuilder::try_build).
/// No cache state is built or modified when this is returned.
///
/// # Example
///
/// ```
/// use lfukit::policy::lfu::LfuCache;
///
/// let err = LfuCache::try_new(-5).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Error for a capacity below zero.
    pub fn negative_capacity(capacity: i64) -> Self {
        Self::new(format!(
            "cache capacity must be non-negative, got {capacity}"
        ))
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Converts a signed capacity into a `usize`, rejecting negative values.
pub(crate) fn checked_capacity(capacity: i64) -> Result<usize, ConfigError> {
    usize::try_from(capacity).map_err(|_| ConfigError::negative_capacity(capacity))
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
