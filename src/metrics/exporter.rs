use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::LfuMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for [`LfuMetricsSnapshot`].
///
/// Writes the text exposition format so the output can be scraped directly
/// or forwarded to a collector.
///
/// # Example
///
/// ```
/// use lfukit::metrics::{LfuMetricsSnapshot, MetricsExporter, PrometheusTextExporter};
///
/// let exporter = PrometheusTextExporter::new("lfu", Vec::new());
/// exporter.export(&LfuMetricsSnapshot::default());
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("lfu_get_calls_total 0"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LfuMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LfuMetricsSnapshot) {
        self.write_counter("get_calls_total", snapshot.get_calls);
        self.write_counter("get_hits_total", snapshot.get_hits);
        self.write_counter("get_misses_total", snapshot.get_misses);
        self.write_counter("insert_calls_total", snapshot.insert_calls);
        self.write_counter("insert_updates_total", snapshot.insert_updates);
        self.write_counter("insert_new_total", snapshot.insert_new);
        self.write_counter("insert_rejected_total", snapshot.insert_rejected);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("promotions_total", snapshot.promotions);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_counter("recapacitate_calls_total", snapshot.recapacitate_calls);
        self.write_counter("peek_calls_total", snapshot.peek_calls);
        self.write_counter("peek_found_total", snapshot.peek_found);
        self.write_counter("frequency_calls_total", snapshot.frequency_calls);
        self.write_counter("frequency_found_total", snapshot.frequency_found);
        self.write_counter("snapshot_calls_total", snapshot.snapshot_calls);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
        self.write_gauge("bucket_count", snapshot.bucket_count as u64);
        self.write_gauge("min_freq", snapshot.min_freq);
    }
}
