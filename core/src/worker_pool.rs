use crate::chunk::Chunk;
use crate::error::RunError;
use crate::scheduler::{DispatchPlan, WorkQueue};
use log::{debug, trace};
use std::sync::mpsc;
use std::thread;

/// Output of one mapper invocation over one chunk.
#[derive(Debug, Clone)]
pub struct PartialResult<R> {
    pub chunk_index: usize,
    pub value: R,
}

/// A bounded set of OS threads that applies the mapper to dispatched chunks.
///
/// Static plans are split into contiguous per-worker blocks up front; queue
/// plans run exactly `num_workers` long-lived workers that pull from the
/// shared queue until it is drained. Either way the pool returns only after
/// every worker has been joined, so the reduce phase never starts while map
/// work is outstanding.
///
/// There is no timeout or cancellation: a mapper that never returns blocks
/// the whole run. Known limitation.
pub struct WorkerPool {
    num_workers: usize,
}

impl WorkerPool {
    pub fn new(num_workers: usize) -> Self {
        Self { num_workers }
    }

    /// Executes `mapper` over every chunk in `plan`, returning one partial
    /// result per chunk in no promised order.
    ///
    /// A panicking mapper aborts the run with `WorkerFailure`; partials
    /// collected before the failure are discarded, and no retry happens.
    pub fn execute<T, R, M>(
        &self,
        plan: DispatchPlan<T>,
        mapper: &M,
    ) -> Result<Vec<PartialResult<R>>, RunError>
    where
        T: Send,
        R: Send,
        M: Fn(&[T]) -> R + Sync,
    {
        if self.num_workers == 0 {
            return Err(RunError::InvalidArgument(
                "num_workers must be at least 1".to_string(),
            ));
        }
        match plan {
            DispatchPlan::Static(chunks) => self.run_static(chunks, mapper),
            DispatchPlan::Queue(queue) => self.run_queue(queue, mapper),
        }
    }

    /// Static dispatch: the policy-ordered sequence is pre-split into at
    /// most `num_workers` contiguous blocks, one worker per block.
    fn run_static<T, R, M>(
        &self,
        chunks: Vec<Chunk<T>>,
        mapper: &M,
    ) -> Result<Vec<PartialResult<R>>, RunError>
    where
        T: Send,
        R: Send,
        M: Fn(&[T]) -> R + Sync,
    {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let block_size = chunks.len().div_ceil(self.num_workers);
        let mut blocks: Vec<Vec<Chunk<T>>> = Vec::with_capacity(self.num_workers);
        let mut rest = chunks;
        while !rest.is_empty() {
            let tail = rest.split_off(block_size.min(rest.len()));
            blocks.push(rest);
            rest = tail;
        }
        debug!(
            "static dispatch: {} block(s) of up to {} chunk(s) across {} worker(s)",
            blocks.len(),
            block_size,
            self.num_workers
        );

        thread::scope(|scope| {
            let handles: Vec<_> = blocks
                .into_iter()
                .map(|block| {
                    scope.spawn(move || {
                        block
                            .into_iter()
                            .map(|chunk| PartialResult {
                                chunk_index: chunk.index,
                                value: mapper(&chunk.items),
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut partials = Vec::new();
            let mut failure = None;
            for handle in handles {
                match handle.join() {
                    Ok(mut block_partials) => partials.append(&mut block_partials),
                    Err(panic) => failure = Some(panic_message(panic)),
                }
            }
            match failure {
                Some(msg) => Err(RunError::WorkerFailure(msg)),
                None => Ok(partials),
            }
        })
    }

    /// Dynamic dispatch: `num_workers` workers loop on the shared queue and
    /// funnel partials over a channel to this thread, which is the only
    /// collector. A worker exits as soon as it observes the queue empty.
    fn run_queue<T, R, M>(
        &self,
        queue: WorkQueue<T>,
        mapper: &M,
    ) -> Result<Vec<PartialResult<R>>, RunError>
    where
        T: Send,
        R: Send,
        M: Fn(&[T]) -> R + Sync,
    {
        let (result_tx, result_rx) = mpsc::channel::<PartialResult<R>>();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.num_workers)
                .map(|worker_id| {
                    let queue = queue.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        let mut processed = 0usize;
                        while let Some(chunk) = queue.pop() {
                            trace!("worker {} took chunk {}", worker_id, chunk.index);
                            let partial = PartialResult {
                                chunk_index: chunk.index,
                                value: mapper(&chunk.items),
                            };
                            if result_tx.send(partial).is_err() {
                                break;
                            }
                            processed += 1;
                        }
                        debug!(
                            "worker {} found the queue empty after {} chunk(s)",
                            worker_id, processed
                        );
                    })
                })
                .collect();
            drop(result_tx);

            // Collection ends once every worker has dropped its sender.
            let partials: Vec<PartialResult<R>> = result_rx.iter().collect();

            let mut failure = None;
            for handle in handles {
                if let Err(panic) = handle.join() {
                    failure = Some(panic_message(panic));
                }
            }
            match failure {
                Some(msg) => Err(RunError::WorkerFailure(msg)),
                None => Ok(partials),
            }
        })
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "mapper panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(n: usize) -> Vec<Chunk<usize>> {
        (0..n).map(|i| Chunk::new(i, vec![i, i])).collect()
    }

    fn sum_mapper(items: &[usize]) -> usize {
        items.iter().sum()
    }

    #[test]
    fn static_plan_processes_every_chunk_once() {
        let pool = WorkerPool::new(3);
        let partials = pool
            .execute(DispatchPlan::Static(chunks(10)), &sum_mapper)
            .unwrap();
        let mut seen: Vec<usize> = partials.iter().map(|p| p.chunk_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        for partial in &partials {
            assert_eq!(partial.value, partial.chunk_index * 2);
        }
    }

    #[test]
    fn queue_plan_processes_every_chunk_once() {
        let pool = WorkerPool::new(4);
        let queue = WorkQueue::new(chunks(9));
        let partials = pool
            .execute(DispatchPlan::Queue(queue), &sum_mapper)
            .unwrap();
        let mut seen: Vec<usize> = partials.iter().map(|p| p.chunk_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn more_workers_than_chunks_is_fine() {
        let pool = WorkerPool::new(8);
        let queue = WorkQueue::new(chunks(2));
        let partials = pool
            .execute(DispatchPlan::Queue(queue), &sum_mapper)
            .unwrap();
        assert_eq!(partials.len(), 2);
    }

    #[test]
    fn panicking_mapper_is_a_worker_failure() {
        let pool = WorkerPool::new(2);
        let boom = |items: &[usize]| -> usize {
            if items[0] == 1 {
                panic!("bad chunk");
            }
            items.len()
        };
        let err = pool
            .execute(DispatchPlan::Static(chunks(4)), &boom)
            .unwrap_err();
        match err {
            RunError::WorkerFailure(msg) => assert!(msg.contains("bad chunk")),
            other => panic!("expected WorkerFailure, got {:?}", other),
        }
    }

    #[test]
    fn panicking_mapper_on_queue_plan_is_a_worker_failure() {
        let pool = WorkerPool::new(2);
        let boom = |items: &[usize]| -> usize {
            if items[0] == 2 {
                panic!("bad chunk");
            }
            items.len()
        };
        let err = pool
            .execute(DispatchPlan::Queue(WorkQueue::new(chunks(5))), &boom)
            .unwrap_err();
        assert!(matches!(err, RunError::WorkerFailure(_)));
    }

    #[test]
    fn empty_static_plan_yields_no_partials() {
        let pool = WorkerPool::new(2);
        let partials = pool
            .execute(DispatchPlan::Static(Vec::new()), &sum_mapper)
            .unwrap();
        assert!(partials.is_empty());
    }
}
