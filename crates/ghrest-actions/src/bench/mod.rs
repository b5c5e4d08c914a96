//! Benchmark a pull request with `cargo criterion` and publish to `gh-pages`.
//!
//! The criterion reports of the last `dev` run are copied into
//! `target/criterion` first so every report carries a change interval
//! relative to the development branch.

pub mod index;
pub mod report;

use std::path::{Path, PathBuf};
use std::process::Command;

use ghrest_git::Repository;

pub use index::{default_benchmark_name, generate_index};
pub use report::{ChangeInterval, Significance};

use crate::GH_PAGES;
use crate::command;
use crate::error::Result;
use crate::fs::copy_dir_all;

const BOT_NAME: &str = "bench-bot";
const BOT_EMAIL: &str = "bench-bot@github.com";

/// Inputs of [`benchmark`].
#[derive(Debug, Clone)]
pub struct BenchmarkOptions {
    /// Root of the local checkout.
    pub repo_dir: PathBuf,
    /// Number of the pull request being benchmarked.
    pub pr_number: u64,
    /// Root benchmark directory on `gh-pages`, relative to `repo_dir`.
    pub bench_dir: PathBuf,
    /// Directory under `bench_dir` for this run. Defaults to the PR number.
    pub storage: Option<String>,
}

impl BenchmarkOptions {
    /// Options with the default `bench` directory.
    pub fn new(repo_dir: impl Into<PathBuf>, pr_number: u64) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            pr_number,
            bench_dir: PathBuf::from("bench"),
            storage: None,
        }
    }

    /// The storage directory name.
    #[must_use]
    pub fn storage(&self) -> String {
        self.storage
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(|| self.pr_number.to_string(), String::from)
    }
}

/// Benchmark the checked out pull request and push the results.
///
/// Returns the name of the pushed `gh-pages_<pr>_<timestamp>` branch, which
/// is meant to be merged into `gh-pages` by a follow-up pull request.
///
/// # Errors
/// Returns error if any git operation, `cargo criterion`, or the index
/// generation fails.
pub fn benchmark<F>(opts: &BenchmarkOptions, name_of: F) -> Result<String>
where
    F: Fn(&Path) -> String,
{
    ghrest_git::configure_identity(&opts.repo_dir, BOT_EMAIL, BOT_NAME)?;
    let repo = Repository::open(&opts.repo_dir)?;
    let bench_dir = opts.repo_dir.join(&opts.bench_dir);
    let target = opts.repo_dir.join("target").join("criterion");

    copy_dev_baseline(&repo, &bench_dir, &target)?;
    command::run(
        Command::new("cargo")
            .args(["criterion", "--message-format=json"])
            .current_dir(&opts.repo_dir),
    )?;

    repo.switch_branch(GH_PAGES, true)?;
    let storage = bench_dir.join(opts.storage()).join("criterion");
    let copied = copy_dir_all(&target, &storage)?;
    tracing::info!(files = copied, dst = %storage.display(), "copied benchmark results");

    generate_index(&bench_dir, 1, name_of)?;

    repo.commit_paths(&[&opts.bench_dir], "add benchmarks")?;
    let branch = format!(
        "{GH_PAGES}_{}_{}",
        opts.pr_number,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    repo.create_branch(&branch)?;
    repo.push(&branch)?;

    tracing::info!(%branch, "pushed benchmark results");
    Ok(branch)
}

/// Copy the last `dev` reports from `gh-pages` into `target/criterion`.
///
/// Leaves the repository on a fresh temporary branch at the original HEAD.
fn copy_dev_baseline(repo: &Repository, bench_dir: &Path, target: &Path) -> Result<()> {
    let branch = ghrest_git::default_temp_branch_name();
    repo.create_branch(&branch)?;
    repo.switch_branch(GH_PAGES, true)?;

    let dev = bench_dir.join(index::DEV_DIR).join("criterion");
    if dev.is_dir() {
        let copied = copy_dir_all(&dev, target)?;
        tracing::info!(files = copied, "copied dev baseline");
    } else {
        tracing::info!(path = %dev.display(), "no dev baseline");
    }

    repo.switch_branch(&branch, false)?;
    Ok(())
}
