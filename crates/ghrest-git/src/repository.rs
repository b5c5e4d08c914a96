//! Repository wrapper providing high-level git operations.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{BranchType, IndexAddOption, Oid};

use crate::error::{Error, Result};

/// Run the `git` binary, returning its trimmed stdout.
pub(crate) fn run_git(cwd: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    tracing::debug!(args = %args.join(" "), "running git");
    let output = command.output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(Error::CommandFailed {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// High-level wrapper around a git repository.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path)?;
        Ok(Self { inner })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a git repository.
    pub fn open_current() -> Result<Self> {
        Self::open(".")
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    fn require_workdir(&self) -> Result<&Path> {
        self.workdir().ok_or(Error::NotARepository)
    }

    // === Branch operations ===

    /// Get the name of the current branch.
    ///
    /// # Errors
    /// Returns error if HEAD is detached.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(Error::DetachedHead)
    }

    /// Check if a branch exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }

    /// Create a new branch at the current HEAD.
    ///
    /// Works with a detached HEAD, which is how pull request checkouts look
    /// inside GitHub Actions.
    ///
    /// # Errors
    /// Returns error if branch creation fails.
    pub fn create_branch(&self, name: &str) -> Result<Oid> {
        let head_commit = self.inner.head()?.peel_to_commit()?;
        let branch = self.inner.branch(name, &head_commit, false)?;

        branch
            .get()
            .target()
            .ok_or_else(|| Error::BranchNotFound(name.into()))
    }

    /// Checkout a branch.
    ///
    /// # Errors
    /// Returns error if checkout fails.
    pub fn checkout(&self, branch_name: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch_name.into()))?;

        let reference = branch.get();
        let object = reference.peel(git2::ObjectType::Commit)?;

        self.inner.checkout_tree(&object, None)?;
        self.inner.set_head(&format!("refs/heads/{branch_name}"))?;

        tracing::debug!(branch = branch_name, "checked out branch");
        Ok(())
    }

    /// Create a branch at HEAD and check it out (`git checkout -b`).
    ///
    /// # Errors
    /// Returns error if creation or checkout fails.
    pub fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.create_branch(name)?;
        self.checkout(name)
    }

    /// Switch to another branch, optionally fetching it from origin first.
    ///
    /// # Errors
    /// Returns error if the fetch or the checkout fails.
    pub fn switch_branch(&self, branch_name: &str, fetch: bool) -> Result<()> {
        if fetch {
            self.fetch(branch_name)?;
        }
        self.checkout(branch_name)?;
        tracing::info!(branch = branch_name, fetch, "switched branch");
        Ok(())
    }

    // === Commit operations ===

    /// Stage everything under `paths` (additions, modifications and
    /// deletions) and commit it on the current branch.
    ///
    /// Paths may be absolute or relative to the working directory. When the
    /// staged tree matches HEAD no commit is made and HEAD is returned.
    ///
    /// # Errors
    /// Returns error if staging or committing fails, or if user.name/email
    /// are not configured.
    pub fn commit_paths<P: AsRef<Path>>(&self, paths: &[P], message: &str) -> Result<Oid> {
        let workdir = self.require_workdir()?.to_path_buf();
        let specs: Vec<String> = paths
            .iter()
            .map(|p| pathspec(&workdir, p.as_ref()))
            .collect();

        let mut index = self.inner.index()?;
        index.add_all(specs.iter().map(String::as_str), IndexAddOption::DEFAULT, None)?;
        index.update_all(specs.iter().map(String::as_str), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let parent = self.inner.head()?.peel_to_commit()?;
        if parent.tree_id() == tree_id {
            tracing::info!(head = %parent.id(), "nothing to commit");
            return Ok(parent.id());
        }

        let tree = self.inner.find_tree(tree_id)?;
        let signature = self.inner.signature()?;
        let oid = self.inner.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        tracing::info!(commit = %oid, message, "committed changes");
        Ok(oid)
    }

    // === Remote operations ===

    /// Get the URL of the origin remote.
    ///
    /// # Errors
    /// Returns error if origin remote is not found.
    pub fn origin_url(&self) -> Result<String> {
        let remote = self
            .inner
            .find_remote("origin")
            .map_err(|_| Error::RemoteNotFound("origin".into()))?;

        remote
            .url()
            .map(String::from)
            .ok_or_else(|| Error::RemoteNotFound("origin".into()))
    }

    /// Parse owner and repo name from a GitHub URL.
    ///
    /// Supports both HTTPS and SSH URLs:
    /// - `https://github.com/owner/repo.git`
    /// - `git@github.com:owner/repo.git`
    ///
    /// # Errors
    /// Returns error if URL cannot be parsed.
    pub fn parse_github_remote(url: &str) -> Result<(String, String)> {
        let rest = url
            .strip_prefix("git@github.com:")
            .or_else(|| url.strip_prefix("ssh://git@github.com/"))
            .or_else(|| url.strip_prefix("https://github.com/"))
            .or_else(|| url.strip_prefix("http://github.com/"));

        if let Some(rest) = rest {
            let path = rest.trim_end_matches('/');
            let path = path.strip_suffix(".git").unwrap_or(path);
            if let Some((owner, repo)) = path.split_once('/') {
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') {
                    return Ok((owner.to_string(), repo.to_string()));
                }
            }
        }

        Err(Error::InvalidRemoteUrl(url.to_string()))
    }

    /// Fetch a branch from origin into the local branch of the same name.
    ///
    /// # Errors
    /// Returns error if fetch fails.
    pub fn fetch(&self, branch: &str) -> Result<()> {
        let workdir = self.require_workdir()?;

        // Use refspec to update both remote tracking branch and local branch
        let refspec = format!("{branch}:refs/heads/{branch}");
        run_git(Some(workdir), &["fetch", "origin", &refspec]).map_err(|e| match e {
            Error::CommandFailed { stderr, .. } => Error::FetchFailed(stderr),
            other => other,
        })?;

        Ok(())
    }

    /// Push a branch to origin.
    ///
    /// # Errors
    /// Returns error if push fails.
    pub fn push(&self, branch: &str) -> Result<()> {
        let workdir = self.require_workdir()?;

        run_git(Some(workdir), &["push", "origin", branch]).map_err(|e| match e {
            Error::CommandFailed { stderr, .. } => Error::PushFailed(stderr),
            other => other,
        })?;

        tracing::info!(branch, "pushed branch");
        Ok(())
    }

    /// Push a branch, forking and pushing `alt` instead if the push is rejected.
    ///
    /// A rejected primary push is always reported as [`Error::PushRejected`],
    /// even when `alt` was pushed successfully, so callers know the intended
    /// branch was not updated.
    ///
    /// # Errors
    /// Returns [`Error::PushRejected`] if `branch` could not be pushed, or the
    /// error of the fallback push if that failed too.
    pub fn push_with_fallback(&self, branch: &str, alt: Option<&str>) -> Result<()> {
        let Err(err) = self.push(branch) else {
            return Ok(());
        };
        tracing::warn!(branch, error = %err, "push rejected");

        if let Some(alt) = alt {
            self.checkout(branch)?;
            self.checkout_new_branch(alt)?;
            self.push(alt)?;
            tracing::warn!(branch, alt, "pushed fallback branch instead");
        }

        Err(Error::PushRejected {
            branch: branch.to_string(),
            alt: alt.map(String::from),
        })
    }
}

/// Express `path` as a pathspec relative to `workdir`.
fn pathspec(workdir: &Path, path: &Path) -> String {
    let relative: PathBuf = if path.is_absolute() {
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        path.strip_prefix(&workdir)
            .map_or_else(|_| path.clone(), Path::to_path_buf)
    } else {
        path.to_path_buf()
    };

    relative
        .to_string_lossy()
        .trim_start_matches("./")
        .replace('\\', "/")
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_test_repo() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();

        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        // Create initial commit with owned signature (avoids borrowing repo)
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        drop(tree);

        let wrapped = Repository { inner: repo };
        (temp, wrapped)
    }

    fn head_tree_has(repo: &Repository, path: &str) -> bool {
        let tree = repo.inner.head().unwrap().peel_to_tree().unwrap();
        tree.get_path(Path::new(path)).is_ok()
    }

    #[test]
    fn test_current_branch() {
        let (_temp, repo) = init_test_repo();
        let branch = repo.current_branch().unwrap();
        assert!(branch == "main" || branch == "master");
    }

    #[test]
    fn test_checkout_new_branch() {
        let (_temp, repo) = init_test_repo();

        repo.checkout_new_branch("_branch_0123456789").unwrap();
        assert!(repo.branch_exists("_branch_0123456789"));
        assert_eq!(repo.current_branch().unwrap(), "_branch_0123456789");
    }

    #[test]
    fn test_switch_branch_without_fetch() {
        let (_temp, repo) = init_test_repo();
        let main = repo.current_branch().unwrap();

        repo.checkout_new_branch("gh-pages").unwrap();
        repo.switch_branch(&main, false).unwrap();
        assert_eq!(repo.current_branch().unwrap(), main);
    }

    #[test]
    fn test_switch_to_missing_branch_fails() {
        let (_temp, repo) = init_test_repo();
        let err = repo.switch_branch("does-not-exist", false).unwrap_err();
        assert!(matches!(err, Error::BranchNotFound(_)));
    }

    #[test]
    fn test_commit_paths_stages_additions_and_deletions() {
        let (temp, repo) = init_test_repo();
        let bench = temp.path().join("bench/12/criterion");
        fs::create_dir_all(&bench).unwrap();
        fs::write(bench.join("report.json"), "{}").unwrap();
        fs::write(temp.path().join("unrelated.txt"), "ignored").unwrap();

        repo.commit_paths(&["bench"], "add benchmarks").unwrap();
        assert!(head_tree_has(&repo, "bench/12/criterion/report.json"));
        assert!(!head_tree_has(&repo, "unrelated.txt"));

        fs::remove_dir_all(temp.path().join("bench/12")).unwrap();
        fs::create_dir_all(temp.path().join("bench/13")).unwrap();
        fs::write(temp.path().join("bench/13/index.html"), "<html/>").unwrap();

        // Absolute paths are accepted too
        repo.commit_paths(&[temp.path().join("bench")], "add benchmarks")
            .unwrap();
        assert!(!head_tree_has(&repo, "bench/12/criterion/report.json"));
        assert!(head_tree_has(&repo, "bench/13/index.html"));

        let head = repo.inner.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("add benchmarks"));
    }

    #[test]
    fn test_push_to_local_remote() {
        let (_temp, repo) = init_test_repo();
        let remote_dir = TempDir::new().unwrap();
        git2::Repository::init_bare(remote_dir.path()).unwrap();
        repo.inner
            .remote("origin", &remote_dir.path().to_string_lossy())
            .unwrap();

        repo.checkout_new_branch("gh-pages_1_20240101_000000").unwrap();
        repo.push("gh-pages_1_20240101_000000").unwrap();

        let remote = git2::Repository::open_bare(remote_dir.path()).unwrap();
        assert!(remote
            .find_reference("refs/heads/gh-pages_1_20240101_000000")
            .is_ok());
    }

    #[test]
    fn test_commit_paths_without_changes_keeps_head() {
        let (temp, repo) = init_test_repo();
        fs::create_dir_all(temp.path().join("profiling")).unwrap();
        fs::write(temp.path().join("profiling/index.md"), "# Profiling\n").unwrap();

        let first = repo.commit_paths(&["profiling"], "update profiling results").unwrap();
        let again = repo.commit_paths(&["profiling"], "update profiling results").unwrap();

        assert_eq!(first, again);
        let head = repo.inner.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id(), first);
        assert_eq!(head.parent(0).unwrap().message(), Some("Initial commit"));
    }

    #[test]
    fn test_push_with_fallback_pushes_alt_branch() {
        let (temp, repo) = init_test_repo();
        let remote_dir = TempDir::new().unwrap();
        let remote = git2::Repository::init_bare(remote_dir.path()).unwrap();
        repo.inner
            .remote("origin", &remote_dir.path().to_string_lossy())
            .unwrap();

        repo.checkout_new_branch("gh-pages").unwrap();
        repo.push("gh-pages").unwrap();

        // Someone else updates gh-pages first
        let sig = git2::Signature::now("Other", "other@example.com").unwrap();
        let published = remote
            .find_reference("refs/heads/gh-pages")
            .unwrap()
            .peel_to_commit()
            .unwrap();
        let concurrent = remote
            .commit(
                Some("refs/heads/gh-pages"),
                &sig,
                &sig,
                "concurrent update",
                &published.tree().unwrap(),
                &[&published],
            )
            .unwrap();

        fs::create_dir_all(temp.path().join("profiling")).unwrap();
        fs::write(temp.path().join("profiling/20240101_server.svg"), "<svg/>").unwrap();
        let local = repo
            .commit_paths(&["profiling"], "update profiling results")
            .unwrap();

        let err = repo
            .push_with_fallback("gh-pages", Some("gh-pages_prof_20240101"))
            .unwrap_err();
        assert!(matches!(
            &err,
            Error::PushRejected { branch, alt: Some(alt) }
                if branch == "gh-pages" && alt == "gh-pages_prof_20240101"
        ));
        assert!(err.to_string().ends_with("Pushed to gh-pages_prof_20240101 instead."));

        let tip = |name: &str| {
            remote
                .find_reference(name)
                .unwrap()
                .peel_to_commit()
                .unwrap()
                .id()
        };
        assert_eq!(tip("refs/heads/gh-pages_prof_20240101"), local);
        assert_eq!(tip("refs/heads/gh-pages"), concurrent);
        assert_eq!(repo.current_branch().unwrap(), "gh-pages_prof_20240101");
    }

    #[test]
    fn test_push_with_fallback_reports_rejection() {
        let (temp, repo) = init_test_repo();
        let missing = temp.path().join("no-such-remote");
        repo.inner
            .remote("origin", &missing.to_string_lossy())
            .unwrap();

        let main = repo.current_branch().unwrap();
        let err = repo.push_with_fallback(&main, None).unwrap_err();
        assert!(matches!(err, Error::PushRejected { alt: None, .. }));
    }

    #[test]
    fn test_fetch_failure() {
        let (temp, repo) = init_test_repo();
        let missing = temp.path().join("no-such-remote");
        repo.inner
            .remote("origin", &missing.to_string_lossy())
            .unwrap();

        let err = repo.switch_branch("gh-pages", true).unwrap_err();
        assert!(matches!(err, Error::FetchFailed(_)));
    }

    #[test]
    fn test_parse_github_remote() {
        assert_eq!(
            Repository::parse_github_remote("git@github.com:owner/repo.git").unwrap(),
            ("owner".to_string(), "repo".to_string())
        );
        assert_eq!(
            Repository::parse_github_remote("https://github.com/owner/repo").unwrap(),
            ("owner".to_string(), "repo".to_string())
        );
        assert_eq!(
            Repository::parse_github_remote("ssh://git@github.com/owner/repo.git").unwrap(),
            ("owner".to_string(), "repo".to_string())
        );
        assert!(Repository::parse_github_remote("https://gitlab.com/owner/repo").is_err());
        assert!(Repository::parse_github_remote("https://github.com/owner").is_err());
    }

    #[test]
    fn test_pathspec() {
        let workdir = Path::new("/work");
        assert_eq!(pathspec(workdir, Path::new("./bench")), "bench");
        assert_eq!(pathspec(workdir, Path::new("profiling")), "profiling");
    }
}
