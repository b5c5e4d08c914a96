//! Error types for ghrest-actions.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a workflow.
#[derive(Debug, Error)]
pub enum Error {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] ghrest_git::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking a directory tree.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Error reading a glob match.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Configuration file could not be parsed.
    #[error("invalid config file {path}: {source}")]
    Config {
        /// Path of the config file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: toml::de::Error,
    },

    /// An external command exited with a non-zero status.
    #[error("command `{command}` failed ({status}){}", stderr_suffix(.stderr))]
    CommandFailed {
        /// The command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, if any.
        stderr: String,
    },

    /// A criterion change value could not be parsed as a percentage.
    #[error("invalid performance change value: {0:?}")]
    InvalidChange(String),

    /// The application to profile exited successfully before it could be profiled.
    #[error(
        "the launched application `{command}` has already finished - please use a long running command instead"
    )]
    AlreadyFinished {
        /// The command line.
        command: String,
    },

    /// The application to profile failed right after launch.
    #[error("the launched application `{command}` failed ({status})\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    LaunchFailed {
        /// The command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// An application to profile has an empty command line.
    #[error("no command configured for application `{0}`")]
    EmptyCommand(String),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
