use crate::chunk::Chunk;
use crate::error::RunError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Strategy for handing chunks to the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Chunks enter the pool in partition order.
    Default,
    /// The chunk sequence is shuffled once before dispatch.
    Random,
    /// Chunks are regrouped by `index % num_workers`, group 0 first, so
    /// chunks destined for the same worker sit contiguously.
    RoundRobin,
    /// No pre-assignment: chunks go into a shared pending-work queue and
    /// idle workers pull the next one first-come-first-served.
    FreeWorker,
}

impl SchedulePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SchedulePolicy::Default => "default",
            SchedulePolicy::Random => "random",
            SchedulePolicy::RoundRobin => "round_robin",
            SchedulePolicy::FreeWorker => "free_core",
        }
    }
}

impl std::str::FromStr for SchedulePolicy {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SchedulePolicy::Default),
            "random" => Ok(SchedulePolicy::Random),
            "round_robin" => Ok(SchedulePolicy::RoundRobin),
            "free_core" => Ok(SchedulePolicy::FreeWorker),
            other => Err(RunError::InvalidArgument(format!(
                "unknown schedule policy '{}'",
                other
            ))),
        }
    }
}

/// Shared pending-work queue for the free-worker policy. Each pop is one
/// minimal critical section, so no two workers can receive the same chunk.
pub struct WorkQueue<T> {
    pending: Arc<Mutex<VecDeque<Chunk<T>>>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("WorkQueue")
            .field("pending", &*pending)
            .finish()
    }
}

impl<T> WorkQueue<T> {
    pub fn new(chunks: Vec<Chunk<T>>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(chunks.into())),
        }
    }

    /// Takes the next pending chunk, or `None` once the queue is drained.
    pub fn pop(&self) -> Option<Chunk<T>> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.pop_front()
    }

    pub fn len(&self) -> usize {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the scheduler hands the pool: either a policy-ordered sequence for
/// static dispatch, or a live queue for dynamic dispatch.
pub enum DispatchPlan<T> {
    Static(Vec<Chunk<T>>),
    Queue(WorkQueue<T>),
}

impl<T: std::fmt::Debug> std::fmt::Debug for DispatchPlan<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchPlan::Static(chunks) => f.debug_tuple("Static").field(chunks).finish(),
            DispatchPlan::Queue(queue) => f.debug_tuple("Queue").field(queue).finish(),
        }
    }
}

/// Applies `policy` to the partitioned chunks.
///
/// Static policies only reorder the sequence; the pool's block balancing
/// decides which worker executes which chunk. The free-worker policy defers
/// all assignment to runtime draws from the shared queue.
pub fn schedule<T>(
    chunks: Vec<Chunk<T>>,
    num_workers: usize,
    policy: SchedulePolicy,
    rng: &mut impl Rng,
) -> Result<DispatchPlan<T>, RunError> {
    if num_workers == 0 {
        return Err(RunError::InvalidArgument(
            "num_workers must be at least 1".to_string(),
        ));
    }

    match policy {
        SchedulePolicy::Default => Ok(DispatchPlan::Static(chunks)),
        SchedulePolicy::Random => {
            let mut chunks = chunks;
            chunks.shuffle(rng);
            Ok(DispatchPlan::Static(chunks))
        }
        SchedulePolicy::RoundRobin => Ok(DispatchPlan::Static(round_robin(chunks, num_workers))),
        SchedulePolicy::FreeWorker => Ok(DispatchPlan::Queue(WorkQueue::new(chunks))),
    }
}

fn round_robin<T>(chunks: Vec<Chunk<T>>, num_workers: usize) -> Vec<Chunk<T>> {
    let mut groups: Vec<Vec<Chunk<T>>> = (0..num_workers).map(|_| Vec::new()).collect();
    for (i, chunk) in chunks.into_iter().enumerate() {
        groups[i % num_workers].push(chunk);
    }
    groups.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chunks(n: usize) -> Vec<Chunk<usize>> {
        (0..n).map(|i| Chunk::new(i, vec![i])).collect()
    }

    fn indices<T>(plan: &DispatchPlan<T>) -> Vec<usize> {
        match plan {
            DispatchPlan::Static(chunks) => chunks.iter().map(|c| c.index).collect(),
            DispatchPlan::Queue(_) => panic!("expected static plan"),
        }
    }

    #[test]
    fn default_preserves_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = schedule(chunks(5), 2, SchedulePolicy::Default, &mut rng).unwrap();
        assert_eq!(indices(&plan), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn random_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = schedule(chunks(8), 2, SchedulePolicy::Random, &mut rng).unwrap();
        let mut got = indices(&plan);
        got.sort_unstable();
        assert_eq!(got, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn round_robin_groups_by_worker_modulo() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = schedule(chunks(7), 3, SchedulePolicy::RoundRobin, &mut rng).unwrap();
        assert_eq!(indices(&plan), vec![0, 3, 6, 1, 4, 2, 5]);
    }

    #[test]
    fn free_worker_queue_serves_each_chunk_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = schedule(chunks(4), 2, SchedulePolicy::FreeWorker, &mut rng).unwrap();
        let queue = match plan {
            DispatchPlan::Queue(q) => q,
            DispatchPlan::Static(_) => panic!("expected queue plan"),
        };
        let mut seen = Vec::new();
        while let Some(chunk) = queue.pop() {
            seen.push(chunk.index);
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn zero_workers_is_invalid() {
        let mut rng = StdRng::seed_from_u64(3);
        for policy in [
            SchedulePolicy::Default,
            SchedulePolicy::Random,
            SchedulePolicy::RoundRobin,
            SchedulePolicy::FreeWorker,
        ] {
            let err = schedule(chunks(4), 0, policy, &mut rng).unwrap_err();
            assert!(matches!(err, RunError::InvalidArgument(_)));
        }
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in [
            SchedulePolicy::Default,
            SchedulePolicy::Random,
            SchedulePolicy::RoundRobin,
            SchedulePolicy::FreeWorker,
        ] {
            assert_eq!(policy.name().parse::<SchedulePolicy>().unwrap(), policy);
        }
        assert!("lifo".parse::<SchedulePolicy>().is_err());
    }

    #[test]
    fn dispatch_plans_format_for_debugging() {
        let mut rng = StdRng::seed_from_u64(3);
        let static_plan = schedule(chunks(2), 1, SchedulePolicy::Default, &mut rng).unwrap();
        assert!(format!("{:?}", static_plan).starts_with("Static"));

        let queue_plan = schedule(chunks(2), 1, SchedulePolicy::FreeWorker, &mut rng).unwrap();
        let rendered = format!("{:?}", queue_plan);
        assert!(rendered.starts_with("Queue"));
        assert!(rendered.contains("pending"));
    }
}
