use crate::chunk::ChunkStats;
use crate::error::RunError;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Runs `f`, reporting its elapsed wall-clock time alongside its output.
/// Pure observer: the phase value passes through untouched.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Everything recorded about one successful run: the configuration that
/// produced it, chunk-size statistics, per-phase durations, and any
/// partition warnings. Immutable once assembled.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    pub partition_policy: &'static str,
    pub schedule_policy: &'static str,
    pub num_chunks: usize,
    pub num_workers: usize,
    pub avg_chunk_len: f64,
    pub min_chunk_len: usize,
    pub max_chunk_len: usize,
    pub partition_secs: f64,
    pub map_secs: f64,
    pub reduce_secs: f64,
    pub total_secs: f64,
    pub warnings: Vec<String>,
}

impl RunMetrics {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        partition_policy: &'static str,
        schedule_policy: &'static str,
        num_workers: usize,
        chunk_stats: &ChunkStats,
        partition_time: Duration,
        map_time: Duration,
        reduce_time: Duration,
        total_time: Duration,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            partition_policy,
            schedule_policy,
            num_chunks: chunk_stats.count,
            num_workers,
            avg_chunk_len: chunk_stats.avg_len,
            min_chunk_len: chunk_stats.min_len,
            max_chunk_len: chunk_stats.max_len,
            partition_secs: partition_time.as_secs_f64(),
            map_secs: map_time.as_secs_f64(),
            reduce_secs: reduce_time.as_secs_f64(),
            total_secs: total_time.as_secs_f64(),
            warnings,
        }
    }
}

/// Destination for one metrics record per successful run. The storage
/// format is the sink's business; the engine only promises a complete
/// record per run and emits nothing for failed runs.
pub trait MetricsSink {
    fn record(&mut self, metrics: &RunMetrics) -> Result<(), RunError>;
}

/// Discards every record.
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _metrics: &RunMetrics) -> Result<(), RunError> {
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Default)]
pub struct VecSink {
    pub records: Vec<RunMetrics>,
}

impl MetricsSink for VecSink {
    fn record(&mut self, metrics: &RunMetrics) -> Result<(), RunError> {
        self.records.push(metrics.clone());
        Ok(())
    }
}
