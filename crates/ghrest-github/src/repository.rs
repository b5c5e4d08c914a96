//! Repository-scoped operations: pull requests, branches and refs.

use std::path::Path;

use serde::Deserialize;

use crate::client::GitHubClient;
use crate::error::{Error, Result};
use crate::types::{
    Branch, CreatePullRequest, MergePullRequest, MergeResult, PullRequest, PullRequestFile,
    PullRequestState,
};

/// Whether a changed file affects a Rust build.
///
/// True for `Cargo.toml`, `Cargo.lock` and any `*.rs` file.
#[must_use]
pub fn is_rust_file(file: &str) -> bool {
    let path = Path::new(file);
    if path
        .file_name()
        .is_some_and(|name| name == "Cargo.toml" || name == "Cargo.lock")
    {
        return true;
    }
    path.extension().is_some_and(|ext| ext == "rs")
}

/// Pull request as returned by the API.
#[derive(Deserialize)]
struct ApiPr {
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    merged: bool,
    html_url: String,
    head: ApiRef,
    base: ApiRef,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

impl From<ApiPr> for PullRequest {
    fn from(api_pr: ApiPr) -> Self {
        Self {
            number: api_pr.number,
            title: api_pr.title,
            body: api_pr.body,
            state: PullRequestState::from_api(&api_pr.state, api_pr.merged),
            draft: api_pr.draft,
            head_branch: api_pr.head.ref_name,
            base_branch: api_pr.base.ref_name,
            html_url: api_pr.html_url,
        }
    }
}

#[derive(Deserialize)]
struct ApiBranch {
    name: String,
    commit: ApiCommit,
    #[serde(default)]
    protected: bool,
}

#[derive(Deserialize)]
struct ApiCommit {
    sha: String,
}

/// A GitHub repository.
#[derive(Debug, Clone)]
pub struct Repository {
    client: GitHubClient,
    owner: String,
    repo: String,
}

impl Repository {
    /// Bind a client to `owner/repo`.
    pub fn new(client: GitHubClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// The owner of the repository.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The name of the repository.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.repo
    }

    fn path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.owner, self.repo)
    }

    // === PR Operations ===

    /// List open pull requests.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let prs: Vec<ApiPr> = self.client.get_all(&self.path("/pulls")).await?;
        Ok(prs.into_iter().map(PullRequest::from).collect())
    }

    /// Create a pull request, reusing an existing one with the same head and base.
    ///
    /// Returns `Ok(None)` when GitHub refuses to create the PR with
    /// 422 Unprocessable Entity, e.g. because there is nothing to merge.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] if `head` or `base` is empty, or any
    /// API error other than 422.
    pub async fn create_pull_request(&self, pr: &CreatePullRequest) -> Result<Option<PullRequest>> {
        if pr.head.is_empty() || pr.base.is_empty() {
            return Err(Error::InvalidRequest(
                "a pull request needs both a head and a base branch".into(),
            ));
        }

        let existing = self
            .list_pull_requests()
            .await?
            .into_iter()
            .find(|p| p.head_branch == pr.head && p.base_branch == pr.base);
        if let Some(existing) = existing {
            tracing::info!(
                number = existing.number,
                head = %pr.head,
                base = %pr.base,
                "reusing existing pull request"
            );
            return Ok(Some(existing));
        }

        let created: Option<ApiPr> = self.client.try_post(&self.path("/pulls"), pr).await?;
        match created {
            Some(api_pr) => {
                let pr = PullRequest::from(api_pr);
                tracing::info!(number = pr.number, url = %pr.html_url, "created pull request");
                Ok(Some(pr))
            }
            None => {
                tracing::info!(head = %pr.head, base = %pr.base, "pull request not created");
                Ok(None)
            }
        }
    }

    /// Merge a pull request.
    ///
    /// # Errors
    /// Returns error if the merge fails.
    pub async fn merge_pull_request(&self, number: u64) -> Result<MergeResult> {
        self.merge_pull_request_with(number, &MergePullRequest::default())
            .await
    }

    /// Merge a pull request with an explicit method or commit message.
    ///
    /// # Errors
    /// Returns error if the merge fails.
    pub async fn merge_pull_request_with(
        &self,
        number: u64,
        merge: &MergePullRequest,
    ) -> Result<MergeResult> {
        let result: MergeResult = self
            .client
            .put(&self.path(&format!("/pulls/{number}/merge")), merge)
            .await?;
        tracing::info!(number, sha = %result.sha, "merged pull request");
        Ok(result)
    }

    /// Update `update` with the changes in `upstream` by opening a PR and merging it.
    ///
    /// Returns the merge result, or `None` if GitHub declined to create the PR
    /// (typically because `update` already contains `upstream`).
    ///
    /// # Errors
    /// Returns error if an API call fails.
    pub async fn update_branch(&self, update: &str, upstream: &str) -> Result<Option<MergeResult>> {
        let request =
            CreatePullRequest::new(upstream, update, format!("Merge {upstream} into {update}"));

        let Some(pr) = self.create_pull_request(&request).await? else {
            return Ok(None);
        };

        self.merge_pull_request(pr.number).await.map(Some)
    }

    /// List files changed by a pull request.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_pull_request_files(&self, number: u64) -> Result<Vec<PullRequestFile>> {
        self.client
            .get_all(&self.path(&format!("/pulls/{number}/files")))
            .await
    }

    /// Check whether any file changed by a pull request satisfies `pred`.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn pr_has_change<F>(&self, number: u64, pred: F) -> Result<bool>
    where
        F: Fn(&str) -> bool,
    {
        let files = self.list_pull_request_files(number).await?;
        Ok(files.iter().any(|file| pred(&file.filename)))
    }

    /// Check whether a pull request touches Rust sources or Cargo manifests.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn pr_has_rust_change(&self, number: u64) -> Result<bool> {
        self.pr_has_change(number, is_rust_file).await
    }

    // === Branch and Ref Operations ===

    /// List branches.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_branches(&self) -> Result<Vec<Branch>> {
        let branches: Vec<ApiBranch> = self.client.get_all(&self.path("/branches")).await?;
        Ok(branches
            .into_iter()
            .map(|b| Branch {
                name: b.name,
                sha: b.commit.sha,
                protected: b.protected,
            })
            .collect())
    }

    /// Delete a git reference, e.g. `heads/feature` or `tags/v1.0`.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn delete_ref(&self, ref_name: &str) -> Result<()> {
        let ref_name = ref_name.strip_prefix("refs/").unwrap_or(ref_name);
        self.client
            .delete(&self.path(&format!("/git/refs/{ref_name}")))
            .await?;
        tracing::info!(ref_name, "deleted ref");
        Ok(())
    }

    /// Delete a branch.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.delete_ref(&format!("heads/{branch}")).await
    }
}
