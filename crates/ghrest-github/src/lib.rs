//! # ghrest-github
//!
//! Simple wrapper of GitHub REST APIs: pull requests, branches, git refs
//! and organization repositories.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod client;
mod error;
mod organization;
mod repository;
mod types;

pub use auth::Auth;
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use organization::Organization;
pub use repository::{Repository, is_rust_file};
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use types::{
    Branch, CreatePullRequest, MergeMethod, MergePullRequest, MergeResult, PullRequest,
    PullRequestFile, PullRequestState, RepositorySummary, RepositoryType,
};
