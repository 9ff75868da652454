pub use crate::builder::{DEFAULT_CAPACITY, LfuCacheBuilder};
pub use crate::ds::{SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};

#[cfg(feature = "metrics")]
pub use crate::metrics::{LfuMetricsSnapshot, MetricsExporter, PrometheusTextExporter};
pub use crate::policy::lfu::{
    BucketSnapshot, CacheStats, DEFAULT_BUCKET_PREALLOC, EvictedEntry, FrequencyGroup, LfuCache,
    PutOutcome,
};
pub use crate::session::{OperationRecord, Session};
pub use crate::traits::{CacheIntrospect, CoreCache, LfuCacheTrait, MISS_SENTINEL};
