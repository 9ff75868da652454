//! # Metrics Traits
//!
//! Recording, snapshotting and export are kept apart:
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │  get hit/miss, insert, evict, clear
//!   └──────────────┬──────────────┘
//!                  │
//!                  ▼
//!   ┌─────────────────────────────┐     ┌─────────────────────────────┐
//!   │     LfuMetricsRecorder      │     │   LfuMetricsReadRecorder    │
//!   │  rejected puts, promotions  │     │  &self: peek/frequency/     │
//!   └─────────────────────────────┘     │  snapshot calls             │
//!                                       └─────────────────────────────┘
//!
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (tests, benches)             │    │ (monitoring backends)        │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Common counters for any cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LFU-specific counters recorded from `&mut self` paths.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    fn record_insert_rejected(&mut self);
    fn record_promotion(&mut self);
    fn record_recapacitate(&mut self);
}

/// LFU counters recorded from `&self` paths (interior mutability).
pub trait LfuMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_frequency_call(&self);
    fn record_frequency_found(&self);
    fn record_snapshot_call(&self);
}

/// Produces a point-in-time copy of a cache's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes a snapshot to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
