//! `ghrest bench` commands.

use std::path::Path;

use anyhow::{Context, Result};
use ghrest_actions::bench::{self, BenchmarkOptions, default_benchmark_name};

use super::BenchCommand;
use super::utils::load_config;
use crate::output;

/// Run a benchmark command.
pub fn run(command: BenchCommand, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?.benchmark;

    match command {
        BenchCommand::Run {
            pr,
            bench_dir,
            storage,
            repo_dir,
        } => {
            let opts = BenchmarkOptions {
                repo_dir,
                pr_number: pr,
                bench_dir: bench_dir.unwrap_or(config.bench_dir),
                storage: storage.or(config.storage),
            };

            output::info(&format!("Benchmarking PR #{pr}..."));
            let branch = bench::benchmark(&opts, default_benchmark_name)
                .with_context(|| format!("Failed to benchmark PR #{pr}"))?;
            output::success(&format!("Pushed benchmark results to {branch}"));
            output::essential(&branch);
        }
        BenchCommand::Index { bench_dir, history } => {
            let bench_dir = bench_dir.unwrap_or(config.bench_dir);
            let history = history.unwrap_or(config.history);

            let index = bench::generate_index(&bench_dir, history, default_benchmark_name)
                .with_context(|| format!("Failed to index {}", bench_dir.display()))?;
            output::success(&format!("Generated {}", index.display()));
        }
    }

    Ok(())
}
