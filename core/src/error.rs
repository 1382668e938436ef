/// Run-level failures. Detected before any worker is spawned
/// (`InvalidArgument`, `EmptyInput`) or while collecting map output
/// (`WorkerFailure`). A degenerate partition is not an error; it is
/// reported as a warning on the run's metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// Bad chunk count, bad worker count, or an unknown policy name.
    InvalidArgument(String),

    /// The input sequence has nothing to process.
    EmptyInput,

    /// A mapper invocation panicked; the run is aborted without retry.
    WorkerFailure(String),

    /// The metrics sink rejected the run's record.
    MetricsSink(String),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            RunError::EmptyInput => write!(f, "Input is empty"),
            RunError::WorkerFailure(msg) => write!(f, "Worker failed: {}", msg),
            RunError::MetricsSink(msg) => write!(f, "Metrics sink error: {}", msg),
        }
    }
}

impl std::error::Error for RunError {}
