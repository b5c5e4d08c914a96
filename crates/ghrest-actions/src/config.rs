//! Configuration file (`ghrest.toml`).
//!
//! ```toml
//! [benchmark]
//! bench_dir = "bench"
//! history = 1
//!
//! [profiling]
//! profile = "release"
//! prof_dir = "profiling"
//! history = 5
//!
//! [profiling.apps]
//! server = ["target/release/server", "--port", "8080"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Benchmark workflow settings.
    pub benchmark: BenchmarkConfig,

    /// Profiling workflow settings.
    pub profiling: ProfilingConfig,
}

/// Settings for the benchmark workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Root benchmark directory on the `gh-pages` branch.
    pub bench_dir: PathBuf,

    /// Number of numbered result directories to keep.
    pub history: usize,

    /// Directory under `bench_dir` for this run. Defaults to the PR number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            bench_dir: PathBuf::from("bench"),
            history: 1,
            storage: None,
        }
    }
}

/// Settings for the profiling workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    /// Cargo profile used to build the applications.
    pub profile: String,

    /// Directory for flame graphs on the `gh-pages` branch.
    pub prof_dir: PathBuf,

    /// Days of flame graphs to keep.
    pub history: u32,

    /// Applications to profile: name to command line.
    pub apps: BTreeMap<String, Vec<String>>,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            prof_dir: PathBuf::from("profiling"),
            history: 5,
            apps: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Default config file name, looked up in the working directory.
    pub const DEFAULT_FILE: &'static str = "ghrest.toml";

    /// Load configuration from `path`, falling back to defaults if the file
    /// doesn't exist.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
