//! Global git identity for bot commits.

use std::path::Path;

use crate::error::Result;
use crate::repository::run_git;

/// Configure git for committing from a CI runner.
///
/// Marks `repo_dir` as a safe directory (the checkout is usually owned by a
/// different user inside containers) and sets the global commit identity.
/// The email does not need to be a valid address.
///
/// # Errors
/// Returns error if any `git config` invocation fails.
pub fn configure_identity(repo_dir: impl AsRef<Path>, email: &str, name: &str) -> Result<()> {
    let repo_dir = repo_dir.as_ref().to_string_lossy();

    run_git(
        None,
        &["config", "--global", "--add", "safe.directory", &repo_dir],
    )?;
    run_git(None, &["config", "--global", "user.email", email])?;
    run_git(None, &["config", "--global", "user.name", name])?;

    tracing::info!(%repo_dir, email, name, "configured git identity");
    Ok(())
}
