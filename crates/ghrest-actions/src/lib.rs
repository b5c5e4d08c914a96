//! # ghrest-actions
//!
//! GitHub Actions workflows for Rust projects:
//!
//! - [`bench`]: run `cargo criterion` on a pull request and publish the
//!   reports, with a markdown index, to the `gh-pages` branch.
//! - [`profiling`]: profile long-running binaries with `nperf` and publish
//!   flame graphs to `gh-pages`.

pub mod bench;
pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod profiling;

pub use config::Config;
pub use error::{Error, Result};

/// Branch that hosts published reports.
pub const GH_PAGES: &str = "gh-pages";
