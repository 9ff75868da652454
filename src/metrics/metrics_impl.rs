use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder};

#[derive(Debug, Default)]
pub struct LfuMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub insert_rejected: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub promotions: u64,
    pub clear_calls: u64,
    pub recapacitate_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub frequency_calls: MetricsCell,
    pub frequency_found: MetricsCell,
    pub snapshot_calls: MetricsCell,
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_insert_rejected(&mut self) {
        self.insert_rejected += 1;
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_recapacitate(&mut self) {
        self.recapacitate_calls += 1;
    }
}

impl LfuMetricsReadRecorder for &LfuMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    fn record_frequency_call(&self) {
        self.frequency_calls.incr();
    }

    fn record_frequency_found(&self) {
        self.frequency_found.incr();
    }

    fn record_snapshot_call(&self) {
        self.snapshot_calls.incr();
    }
}
