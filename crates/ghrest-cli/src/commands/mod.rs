//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ghrest_github::{MergeMethod, RepositoryType};

pub mod bench;
pub mod branch;
pub mod completions;
pub mod org;
pub mod pr;
pub mod profile;
mod utils;

/// ghrest - GitHub REST helpers and Actions workflows for Rust projects.
///
/// Manage pull requests and branches through the GitHub REST API, and
/// publish criterion benchmarks and nperf flame graphs to gh-pages.
#[derive(Parser)]
#[command(name = "ghrest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output as JSON (for tooling integration).
    ///
    /// Supported by: pr, branch list, org repos
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress informational output.
    ///
    /// Only errors and essential results (like PR URLs) are printed.
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Show debug logs.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Path of the config file.
    #[arg(long, global = true, default_value = ghrest_actions::Config::DEFAULT_FILE)]
    pub config: PathBuf,

    /// Repository as `owner/name`.
    ///
    /// Defaults to `GITHUB_REPOSITORY`, then to the origin remote of the
    /// current checkout.
    #[arg(long, global = true, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Work with pull requests.
    #[command(subcommand)]
    Pr(PrCommand),

    /// Work with remote branches.
    #[command(subcommand)]
    Branch(BranchCommand),

    /// Work with organizations.
    #[command(subcommand)]
    Org(OrgCommand),

    /// Benchmark with cargo criterion and publish to gh-pages.
    #[command(subcommand)]
    Bench(BenchCommand),

    /// Profile applications with nperf and publish flame graphs to gh-pages.
    ///
    /// Applications are read from `[profiling.apps]` in the config file.
    Profile(ProfileArgs),

    /// Generate shell completions.
    ///
    /// Outputs completion script to stdout. Redirect to a file and
    /// source it in your shell configuration.
    #[command(alias = "comp")]
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Pull request commands.
#[derive(Subcommand)]
pub enum PrCommand {
    /// List open pull requests.
    #[command(alias = "ls")]
    List,

    /// List the files changed by a pull request.
    Files {
        /// Pull request number.
        number: u64,
    },

    /// Create a pull request, reusing an open one with the same head and base.
    Create {
        /// Branch with the changes.
        #[arg(long)]
        head: String,

        /// Branch to merge into.
        #[arg(long)]
        base: String,

        /// Pull request title.
        #[arg(long, short)]
        title: String,

        /// Pull request description.
        #[arg(long, short)]
        body: Option<String>,

        /// Create as draft.
        #[arg(long)]
        draft: bool,
    },

    /// Merge a pull request.
    Merge {
        /// Pull request number.
        number: u64,

        /// Merge method: merge, squash or rebase. Defaults to the repository setting.
        #[arg(long, short)]
        method: Option<MergeMethod>,
    },

    /// Print whether a pull request changes any file (or any Rust file).
    HasChange {
        /// Pull request number.
        number: u64,

        /// Only count `*.rs`, `Cargo.toml` and `Cargo.lock`.
        #[arg(long)]
        rust: bool,
    },
}

/// Branch commands.
#[derive(Subcommand)]
pub enum BranchCommand {
    /// List branches.
    #[command(alias = "ls")]
    List,

    /// Delete a branch.
    Delete {
        /// Branch name.
        name: String,
    },

    /// Merge an upstream branch into a branch through a pull request.
    Update {
        /// Branch to update.
        branch: String,

        /// Branch to merge from.
        #[arg(long, short)]
        upstream: String,
    },
}

/// Organization commands.
#[derive(Subcommand)]
pub enum OrgCommand {
    /// List repositories of an organization.
    Repos {
        /// Organization login.
        org: String,

        /// Repository type: all, public, private, forks, sources or member.
        #[arg(long = "type", default_value = "all")]
        kind: RepositoryType,
    },
}

/// Benchmark commands.
#[derive(Subcommand)]
pub enum BenchCommand {
    /// Benchmark a pull request and push the results to a new gh-pages branch.
    Run {
        /// Pull request number.
        #[arg(long)]
        pr: u64,

        /// Root benchmark directory on gh-pages.
        #[arg(long)]
        bench_dir: Option<PathBuf>,

        /// Directory under the benchmark directory for this run (defaults to the PR number).
        #[arg(long)]
        storage: Option<String>,

        /// Root of the local checkout.
        #[arg(long, default_value = ".")]
        repo_dir: PathBuf,
    },

    /// Regenerate the benchmark index.
    Index {
        /// Root benchmark directory.
        #[arg(long)]
        bench_dir: Option<PathBuf>,

        /// Number of numbered result directories to keep (0 keeps all).
        #[arg(long)]
        history: Option<usize>,
    },
}

/// Arguments of the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    /// Root of the local checkout.
    #[arg(long, default_value = ".")]
    pub repo_dir: PathBuf,

    /// Cargo profile used to build the applications.
    #[arg(long)]
    pub profile: Option<String>,

    /// Directory for flame graphs on gh-pages.
    #[arg(long)]
    pub prof_dir: Option<PathBuf>,

    /// Days of flame graphs to keep.
    #[arg(long)]
    pub history: Option<u32>,
}
