use crate::chunk::Chunk;
use crate::error::RunError;
use rand::Rng;

/// Strategy for dividing the input sequence into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionPolicy {
    /// `len / num_chunks` elements per chunk, integer division. Trailing
    /// remainder elements are dropped and reported as a warning.
    Equal,
    /// `num_chunks - 1` sizes drawn uniformly from `[1, len / 2]`, the last
    /// size adjusted so the total reaches `len`, then the size list is
    /// shuffled before slicing.
    Random,
}

impl PartitionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            PartitionPolicy::Equal => "equal",
            PartitionPolicy::Random => "random",
        }
    }
}

impl std::str::FromStr for PartitionPolicy {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(PartitionPolicy::Equal),
            "random" => Ok(PartitionPolicy::Random),
            other => Err(RunError::InvalidArgument(format!(
                "unknown partition policy '{}'",
                other
            ))),
        }
    }
}

/// Anomalies a policy produced while chunking. Carried into the run's
/// metrics so configuration sweeps can spot unstable draws; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionWarning {
    /// Equal-size policy dropped trailing elements that did not fill a chunk.
    RemainderDropped { elements: usize },
    /// Random-size policy drew sizes that left a zero-or-negative final
    /// chunk; the affected chunks were clamped to the input bounds.
    DegenerateChunk { index: usize, requested: i64 },
}

impl std::fmt::Display for PartitionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionWarning::RemainderDropped { elements } => {
                write!(f, "remainder dropped: {} trailing element(s)", elements)
            }
            PartitionWarning::DegenerateChunk { index, requested } => {
                write!(
                    f,
                    "degenerate chunk {}: requested size {}",
                    index, requested
                )
            }
        }
    }
}

/// The ordered chunk sequence plus any anomalies produced while building it.
#[derive(Debug, Clone)]
pub struct Partition<T> {
    pub chunks: Vec<Chunk<T>>,
    pub warnings: Vec<PartitionWarning>,
}

/// Splits `input` into `num_chunks` chunks under `policy`.
///
/// Fails with `InvalidArgument` when `num_chunks` is zero or exceeds the
/// input length (zero-size chunks for every policy). Performs no logging
/// and no timing; instrumentation wraps the call.
pub fn partition<T: Clone>(
    input: &[T],
    num_chunks: usize,
    policy: PartitionPolicy,
    rng: &mut impl Rng,
) -> Result<Partition<T>, RunError> {
    if num_chunks == 0 {
        return Err(RunError::InvalidArgument(
            "num_chunks must be at least 1".to_string(),
        ));
    }
    if num_chunks > input.len() {
        return Err(RunError::InvalidArgument(format!(
            "num_chunks ({}) exceeds input length ({})",
            num_chunks,
            input.len()
        )));
    }

    match policy {
        PartitionPolicy::Equal => Ok(equal_chunks(input, num_chunks)),
        PartitionPolicy::Random => Ok(random_chunks(input, num_chunks, rng)),
    }
}

fn equal_chunks<T: Clone>(input: &[T], num_chunks: usize) -> Partition<T> {
    let size = input.len() / num_chunks;
    let chunks: Vec<Chunk<T>> = (0..num_chunks)
        .map(|i| Chunk::new(i, input[i * size..(i + 1) * size].to_vec()))
        .collect();

    let covered = size * num_chunks;
    let mut warnings = Vec::new();
    if covered < input.len() {
        warnings.push(PartitionWarning::RemainderDropped {
            elements: input.len() - covered,
        });
    }

    Partition { chunks, warnings }
}

fn random_chunks<T: Clone>(input: &[T], num_chunks: usize, rng: &mut impl Rng) -> Partition<T> {
    let len = input.len();

    // num_chunks - 1 independent draws; the last size absorbs the remainder
    // and can come out zero or negative when the draws overshoot.
    let mut sizes: Vec<i64> = (0..num_chunks.saturating_sub(1))
        .map(|_| rng.random_range(1..=(len / 2).max(1)) as i64)
        .collect();
    let drawn: i64 = sizes.iter().sum();
    sizes.push(len as i64 - drawn);

    use rand::seq::SliceRandom;
    sizes.shuffle(rng);

    let mut warnings = Vec::new();
    let mut chunks = Vec::with_capacity(num_chunks);
    let mut start = 0usize;
    for (index, &size) in sizes.iter().enumerate() {
        if size <= 0 {
            warnings.push(PartitionWarning::DegenerateChunk {
                index,
                requested: size,
            });
            chunks.push(Chunk::new(index, Vec::new()));
            continue;
        }
        let end = (start + size as usize).min(len);
        if end - start < size as usize {
            warnings.push(PartitionWarning::DegenerateChunk {
                index,
                requested: size,
            });
        }
        chunks.push(Chunk::new(index, input[start..end].to_vec()));
        start = end;
    }

    Partition { chunks, warnings }
}
