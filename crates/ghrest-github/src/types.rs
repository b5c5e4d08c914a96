//! GitHub API types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A GitHub Pull Request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number.
    pub number: u64,

    /// PR title.
    pub title: String,

    /// PR body/description.
    pub body: Option<String>,

    /// PR state.
    pub state: PullRequestState,

    /// Whether this is a draft PR.
    pub draft: bool,

    /// Head branch name.
    pub head_branch: String,

    /// Base branch name.
    pub base_branch: String,

    /// PR URL.
    pub html_url: String,
}

/// State of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// PR is open.
    Open,
    /// PR was closed without merging.
    Closed,
    /// PR was merged.
    Merged,
}

impl PullRequestState {
    pub(crate) fn from_api(state: &str, merged: bool) -> Self {
        if state == "open" {
            Self::Open
        } else if merged || state == "merged" {
            Self::Merged
        } else {
            Self::Closed
        }
    }
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// Path of the file relative to the repository root.
    pub filename: String,

    /// Change kind: `added`, `removed`, `modified`, `renamed`, ...
    pub status: String,

    /// Lines added.
    #[serde(default)]
    pub additions: u64,

    /// Lines deleted.
    #[serde(default)]
    pub deletions: u64,

    /// Total lines changed.
    #[serde(default)]
    pub changes: u64,
}

/// A branch of a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,

    /// SHA of the branch tip.
    pub sha: String,

    /// Whether branch protection is enabled.
    pub protected: bool,
}

/// A repository as returned by listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository name.
    pub name: String,

    /// `owner/name`.
    pub full_name: String,

    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,

    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,

    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,

    /// Default branch name.
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Repository URL.
    pub html_url: String,
}

/// Filter for listing organization repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    /// Every repository visible to the caller.
    #[default]
    All,
    /// Public repositories.
    Public,
    /// Private repositories.
    Private,
    /// Forks.
    Forks,
    /// Non-fork repositories.
    Sources,
    /// Repositories the caller is a member of.
    Member,
}

impl RepositoryType {
    /// The value of the `type` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Public => "public",
            Self::Private => "private",
            Self::Forks => "forks",
            Self::Sources => "sources",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "forks" => Ok(Self::Forks),
            "sources" => Ok(Self::Sources),
            "member" => Ok(Self::Member),
            _ => Err(format!(
                "invalid repository type: {s} (expected all, public, private, forks, sources or member)"
            )),
        }
    }
}

/// Request to create a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    /// PR title.
    pub title: String,

    /// Head branch.
    pub head: String,

    /// Base branch.
    pub base: String,

    /// PR body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Whether to create as draft.
    pub draft: bool,
}

impl CreatePullRequest {
    /// A non-draft PR with no body.
    pub fn new(head: impl Into<String>, base: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            head: head.into(),
            base: base.into(),
            body: None,
            draft: false,
        }
    }
}

/// Method used to merge a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit.
    Merge,
    /// Squash all commits into one.
    Squash,
    /// Rebase commits onto base.
    Rebase,
}

impl std::str::FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            _ => Err(format!(
                "invalid merge method: {s} (expected merge, squash or rebase)"
            )),
        }
    }
}

/// Request to merge a pull request.
///
/// Every field is optional; the default leaves the choice to the repository
/// settings.
#[derive(Debug, Default, Serialize)]
pub struct MergePullRequest {
    /// Commit title (for squash/merge).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,

    /// Commit message (for squash/merge).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    /// Merge method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<MergeMethod>,
}

/// Result of merging a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    /// SHA of the merge commit.
    pub sha: String,

    /// Whether the merge was successful.
    pub merged: bool,

    /// Message from the API.
    pub message: String,
}
