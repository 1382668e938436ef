use csv::Writer;
use mr_bench_core::{MetricsSink, RunError, RunMetrics};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One flat CSV row per run. Warnings are joined into a single column so
/// the file stays strictly tabular.
#[derive(Serialize)]
struct CsvRecord<'a> {
    partition_policy: &'a str,
    schedule_policy: &'a str,
    num_chunks: usize,
    num_workers: usize,
    avg_chunk_len: f64,
    min_chunk_len: usize,
    max_chunk_len: usize,
    partition_secs: f64,
    map_secs: f64,
    reduce_secs: f64,
    total_secs: f64,
    warnings: String,
}

/// Append-only CSV destination for run metrics. Writes the header row only
/// when the file starts out empty, so repeated sweeps keep appending to the
/// same results file.
pub struct CsvSink {
    writer: Writer<File>,
}

impl CsvSink {
    pub fn append(path: &Path) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_new = file.metadata()?.len() == 0;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        Ok(Self { writer })
    }
}

impl MetricsSink for CsvSink {
    fn record(&mut self, metrics: &RunMetrics) -> Result<(), RunError> {
        let record = CsvRecord {
            partition_policy: metrics.partition_policy,
            schedule_policy: metrics.schedule_policy,
            num_chunks: metrics.num_chunks,
            num_workers: metrics.num_workers,
            avg_chunk_len: metrics.avg_chunk_len,
            min_chunk_len: metrics.min_chunk_len,
            max_chunk_len: metrics.max_chunk_len,
            partition_secs: metrics.partition_secs,
            map_secs: metrics.map_secs,
            reduce_secs: metrics.reduce_secs,
            total_secs: metrics.total_secs,
            warnings: metrics.warnings.join("; "),
        };
        self.writer
            .serialize(record)
            .map_err(|e| RunError::MetricsSink(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| RunError::MetricsSink(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mr_bench_core::ChunkStats;
    use std::time::Duration;

    fn sample_metrics(schedule_policy: &'static str) -> RunMetrics {
        let stats = ChunkStats {
            count: 8,
            avg_len: 4.5,
            min_len: 4,
            max_len: 5,
        };
        RunMetrics::new(
            "equal",
            schedule_policy,
            2,
            &stats,
            Duration::from_millis(1),
            Duration::from_millis(10),
            Duration::from_millis(2),
            Duration::from_millis(14),
            vec!["remainder dropped: 1 trailing element(s)".to_string()],
        )
    }

    #[test]
    fn writes_header_once_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        {
            let mut sink = CsvSink::append(&path).unwrap();
            sink.record(&sample_metrics("default")).unwrap();
        }
        {
            let mut sink = CsvSink::append(&path).unwrap();
            sink.record(&sample_metrics("free_core")).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("partition_policy,schedule_policy"));
        assert!(lines[1].contains("default"));
        assert!(lines[2].contains("free_core"));
        assert!(lines[1].contains("remainder dropped"));
    }
}
