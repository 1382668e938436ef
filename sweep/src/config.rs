use mr_bench_core::{PartitionPolicy, RunConfig, RunError, SchedulePolicy};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_repeat() -> usize {
    1
}

/// JSON description of an experiment grid: every combination of the listed
/// policies, chunk counts, and worker counts is run `repeat` times.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    pub chunk_counts: Vec<usize>,
    pub worker_counts: Vec<usize>,
    pub partition_policies: Vec<String>,
    pub schedule_policies: Vec<String>,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: SweepConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Expands the grid into concrete run configurations. Unknown policy
    /// names fail here, before anything runs.
    pub fn expand(&self) -> Result<Vec<RunConfig>, RunError> {
        let partition_policies = self
            .partition_policies
            .iter()
            .map(|name| name.parse::<PartitionPolicy>())
            .collect::<Result<Vec<_>, _>>()?;
        let schedule_policies = self
            .schedule_policies
            .iter()
            .map(|name| name.parse::<SchedulePolicy>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut grid = Vec::new();
        for &partition_policy in &partition_policies {
            for &schedule_policy in &schedule_policies {
                for &num_chunks in &self.chunk_counts {
                    for &num_workers in &self.worker_counts {
                        grid.push(RunConfig {
                            num_chunks,
                            num_workers,
                            partition_policy,
                            schedule_policy,
                        });
                    }
                }
            }
        }
        Ok(grid)
    }
}
