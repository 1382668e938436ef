//! Partition-and-dispatch engine for studying how chunking and scheduling
//! policy affect the throughput of a single-pass map/reduce job on a
//! bounded worker pool.
//!
//! One run is: partition the input under a [`PartitionPolicy`], order or
//! queue the chunks under a [`SchedulePolicy`], map every chunk on a
//! [`WorkerPool`] of OS threads, fold the partials with the caller's
//! reducer, and hand the per-phase timings to a [`MetricsSink`].

mod chunk;
pub use chunk::{Chunk, ChunkStats};

mod error;
pub use error::RunError;

mod partitioner;
pub use partitioner::{partition, Partition, PartitionPolicy, PartitionWarning};

mod scheduler;
pub use scheduler::{schedule, DispatchPlan, SchedulePolicy, WorkQueue};

mod worker_pool;
pub use worker_pool::{PartialResult, WorkerPool};

mod aggregator;
pub use aggregator::reduce;

mod metrics;
pub use metrics::{timed, MetricsSink, NullSink, RunMetrics, VecSink};

mod runner;
pub use runner::{run, RunConfig, RunOutcome};
