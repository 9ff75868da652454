//! lfukit: an O(1) least-frequently-used cache engine with recency
//! tie-breaking, introspection for visualizers, and an audited session layer.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod session;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
