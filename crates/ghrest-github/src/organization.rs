//! Organization-scoped operations.

use crate::client::GitHubClient;
use crate::error::Result;
use crate::types::{RepositorySummary, RepositoryType};

/// A GitHub organization.
#[derive(Debug, Clone)]
pub struct Organization {
    client: GitHubClient,
    login: String,
}

impl Organization {
    /// Bind a client to an organization login.
    pub fn new(client: GitHubClient, login: impl Into<String>) -> Self {
        Self {
            client,
            login: login.into(),
        }
    }

    /// The organization login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// List repositories of the organization.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_repositories(&self, kind: RepositoryType) -> Result<Vec<RepositorySummary>> {
        self.client
            .get_all(&format!("/orgs/{}/repos?type={kind}", self.login))
            .await
    }
}
