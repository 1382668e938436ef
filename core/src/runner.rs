use crate::aggregator::reduce;
use crate::chunk::ChunkStats;
use crate::error::RunError;
use crate::metrics::{timed, MetricsSink, RunMetrics};
use crate::partitioner::{partition, PartitionPolicy};
use crate::scheduler::{schedule, SchedulePolicy};
use crate::worker_pool::WorkerPool;
use log::{info, warn};
use rand::Rng;
use std::time::Instant;

/// One run's configuration: how to chunk the input and how to hand the
/// chunks to the workers.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub num_chunks: usize,
    pub num_workers: usize,
    pub partition_policy: PartitionPolicy,
    pub schedule_policy: SchedulePolicy,
}

/// The final result plus the metrics of the run that produced it.
#[derive(Debug)]
pub struct RunOutcome<R> {
    pub result: R,
    pub metrics: RunMetrics,
}

/// Runs one complete partition → map → reduce pass over `input`.
///
/// Validation (`EmptyInput`, `InvalidArgument`) happens before any worker
/// thread exists; a failed run has no side effects and emits no metrics
/// record. On success the assembled `RunMetrics` is handed to `sink` and
/// returned alongside the result.
pub fn run<T, R, M, F, S>(
    input: &[T],
    mapper: &M,
    reducer: &F,
    config: &RunConfig,
    rng: &mut impl Rng,
    sink: &mut S,
) -> Result<RunOutcome<R>, RunError>
where
    T: Clone + Send,
    R: Default + Send,
    M: Fn(&[T]) -> R + Sync,
    F: Fn(R, R) -> R,
    S: MetricsSink,
{
    if input.is_empty() {
        return Err(RunError::EmptyInput);
    }

    let total_start = Instant::now();

    let partition_start = Instant::now();
    let partitioned = partition(input, config.num_chunks, config.partition_policy, rng)?;
    let partition_time = partition_start.elapsed();
    let chunk_stats = ChunkStats::from_chunks(&partitioned.chunks);
    for warning in &partitioned.warnings {
        warn!(
            "{}/{}: {}",
            config.partition_policy.name(),
            config.schedule_policy.name(),
            warning
        );
    }

    let plan = schedule(
        partitioned.chunks,
        config.num_workers,
        config.schedule_policy,
        rng,
    )?;

    let pool = WorkerPool::new(config.num_workers);
    let (partials, map_time) = timed(|| pool.execute(plan, mapper));
    let partials = partials?;

    let (result, reduce_time) = timed(|| reduce(partials, reducer));

    let total_time = total_start.elapsed();
    let metrics = RunMetrics::new(
        config.partition_policy.name(),
        config.schedule_policy.name(),
        config.num_workers,
        &chunk_stats,
        partition_time,
        map_time,
        reduce_time,
        total_time,
        partitioned.warnings.iter().map(|w| w.to_string()).collect(),
    );
    info!(
        "run {}/{}: {} chunk(s) (avg len {:.1}) on {} worker(s) in {:.4}s \
         (partition {:.4}s, map {:.4}s, reduce {:.4}s)",
        metrics.partition_policy,
        metrics.schedule_policy,
        metrics.num_chunks,
        metrics.avg_chunk_len,
        metrics.num_workers,
        metrics.total_secs,
        metrics.partition_secs,
        metrics.map_secs,
        metrics.reduce_secs,
    );

    sink.record(&metrics)?;

    Ok(RunOutcome { result, metrics })
}
