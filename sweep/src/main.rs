mod config;
mod csv_sink;

use clap::Parser;
use config::SweepConfig;
use csv_sink::CsvSink;
use mr_bench_core::{run, PartitionPolicy, RunConfig, RunError, SchedulePolicy};
use mr_bench_word_count::{count_words, merge_counts, tokenize, WordCounts};
use std::path::PathBuf;
use std::time::Instant;

/// Experiment driver: runs the word-count job over a grid of partitioning
/// and scheduling configurations, appending one CSV record per run.
#[derive(Parser)]
#[command(name = "mr-bench-sweep")]
struct Args {
    /// Text file to count words in
    input: PathBuf,

    /// CSV file the per-run metrics are appended to
    #[arg(long, default_value = "results.csv")]
    csv: PathBuf,

    /// JSON sweep grid; when omitted, a single run uses the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of chunks for a single run
    #[arg(long, default_value_t = 16)]
    chunks: usize,

    /// Number of workers for a single run
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Partitioning policy: equal | random
    #[arg(long, default_value = "equal")]
    partition: PartitionPolicy,

    /// Scheduling policy: default | random | round_robin | free_core
    #[arg(long, default_value = "default")]
    schedule: SchedulePolicy,

    /// Repetitions per configuration
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// How many of the most frequent words to print at the end
    #[arg(long, default_value_t = 20)]
    top: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run_sweep(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_sweep(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let text = std::fs::read_to_string(&args.input)?;
    let words = tokenize(&text);
    if words.is_empty() {
        return Err(Box::new(RunError::EmptyInput));
    }
    println!(
        "Loaded {} words from {}",
        words.len(),
        args.input.display()
    );

    let (grid, repeat) = match &args.config {
        Some(path) => {
            let sweep = SweepConfig::load(path)?;
            (sweep.expand()?, sweep.repeat)
        }
        None => {
            let single = RunConfig {
                num_chunks: args.chunks,
                num_workers: args.workers,
                partition_policy: args.partition,
                schedule_policy: args.schedule,
            };
            (vec![single], args.repeat)
        }
    };
    println!(
        "Sweeping {} configuration(s), {} repetition(s) each\n",
        grid.len(),
        repeat
    );

    let mut sink = CsvSink::append(&args.csv)?;
    let mut rng = rand::rng();
    let mut last_result: Option<WordCounts> = None;

    for config in &grid {
        for rep in 0..repeat {
            println!(
                "Running {}/{} with {} chunks on {} workers (rep {}/{})",
                config.partition_policy.name(),
                config.schedule_policy.name(),
                config.num_chunks,
                config.num_workers,
                rep + 1,
                repeat
            );
            let outcome = run(
                &words,
                &count_words,
                &merge_counts,
                config,
                &mut rng,
                &mut sink,
            )?;
            println!(
                "  partition {:.4}s  map {:.4}s  reduce {:.4}s  total {:.4}s",
                outcome.metrics.partition_secs,
                outcome.metrics.map_secs,
                outcome.metrics.reduce_secs,
                outcome.metrics.total_secs
            );
            for warning in &outcome.metrics.warnings {
                println!("  warning: {}", warning);
            }
            last_result = Some(outcome.result);
        }
    }

    if let Some(result) = last_result {
        print_top_words(&result, args.top);
    }

    println!(
        "\nDone in {:.2}s, metrics appended to {}",
        start_time.elapsed().as_secs_f64(),
        args.csv.display()
    );
    Ok(())
}

fn print_top_words(counts: &WordCounts, top: usize) {
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    println!("\n=== RESULTS ===");
    for (word, count) in sorted.iter().take(top) {
        println!("{}: {}", word, count);
    }
    if sorted.len() > top {
        println!("... ({} more words)", sorted.len() - top);
    }
}
