//! Counters for observing an [`LfuCache`](crate::policy::lfu::LfuCache).
//!
//! Compiled only with the `metrics` feature. Recording is done by the cache
//! itself; consumers read a [`LfuMetricsSnapshot`] through
//! [`MetricsSnapshotProvider`] or publish it with an exporter.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::LfuMetrics;
pub use snapshot::LfuMetricsSnapshot;
pub use traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsExporter,
    MetricsSnapshotProvider,
};
