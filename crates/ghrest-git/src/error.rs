//! Error types for git operations.

use thiserror::Error;

/// Result type alias for git operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from libgit2.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// I/O error, e.g. failing to spawn the `git` binary.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository has no working directory.
    #[error("not a git repository with a working directory")]
    NotARepository,

    /// HEAD does not point to a branch.
    #[error("HEAD is detached")]
    DetachedHead,

    /// Branch does not exist locally.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Remote does not exist.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Remote URL is not a GitHub URL.
    #[error("invalid GitHub remote URL: {0}")]
    InvalidRemoteUrl(String),

    /// A `git` command exited with a non-zero status.
    #[error("`git {command}` failed: {stderr}")]
    CommandFailed {
        /// Arguments passed to git.
        command: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Fetching from origin failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Pushing to origin failed.
    #[error("push failed: {0}")]
    PushFailed(String),

    /// The branch could not be pushed; `alt` was pushed in its place if set.
    #[error("Failed to push the branch {branch} to GitHub!{}", pushed_instead(.alt.as_deref()))]
    PushRejected {
        /// The branch that was rejected.
        branch: String,
        /// The fallback branch that was pushed instead.
        alt: Option<String>,
    },

    /// More random characters requested than are available.
    #[error("cannot sample {requested} distinct characters from {available}")]
    InvalidSample {
        /// Number of characters requested.
        requested: usize,
        /// Number of characters available.
        available: usize,
    },
}

fn pushed_instead(alt: Option<&str>) -> String {
    alt.map_or_else(String::new, |alt| format!(" Pushed to {alt} instead."))
}
