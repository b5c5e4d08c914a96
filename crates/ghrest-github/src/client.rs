//! GitHub API client.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::organization::Organization;
use crate::repository::Repository;

/// Page size requested from list endpoints (the API maximum).
pub(crate) const PER_PAGE: usize = 100;

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl GitHubClient {
    /// Default GitHub API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new GitHub client.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn new(auth: &Auth) -> Result<Self> {
        Self::with_base_url(auth, Self::DEFAULT_API_URL)
    }

    /// Create a new GitHub client with a custom API URL (for GitHub Enterprise).
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn with_base_url(auth: &Auth, base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(auth, base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Create a new GitHub client with a custom API URL and request timeout.
    ///
    /// # Errors
    /// Returns error if authentication fails or the HTTP client can't be built.
    pub fn with_options(
        auth: &Auth,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("ghrest"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Whether requests carry an `Authorization` header.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bind this client to a repository.
    #[must_use]
    pub fn repository(&self, owner: impl Into<String>, repo: impl Into<String>) -> Repository {
        Repository::new(self.clone(), owner, repo)
    }

    /// Bind this client to an organization.
    #[must_use]
    pub fn organization(&self, login: impl Into<String>) -> Organization {
        Organization::new(self.clone(), login)
    }

    /// Start a request, attaching the bearer token when there is one.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "GitHub API request");

        let builder = self.client.request(method, &url);
        match &self.token {
            Some(token) => {
                builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            None => builder,
        }
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// GET every page of a list endpoint.
    pub(crate) async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .request(Method::GET, path)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;

            let batch: Vec<T> = Self::handle_response(response).await?;
            let len = batch.len();
            items.extend(batch);

            if len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Make a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request, mapping 422 Unprocessable Entity to `None`.
    pub(crate) async fn try_post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let response = self.request(Method::POST, path).json(body).send().await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(%path, body = %text, "GitHub rejected the request with 422");
            return Ok(None);
        }

        Self::handle_response(response).await.map(Some)
    }

    /// Make a PUT request.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(Self::error_from(response).await)
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        if response.status().is_success() {
            let body = response.json().await?;
            return Ok(body);
        }

        Err(Self::error_from(response).await)
    }

    /// Map a non-success response to an [`Error`].
    async fn error_from(response: Response) -> Error {
        let status_code = response.status().as_u16();

        match status_code {
            401 => Error::AuthenticationFailed,
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Error::RateLimited
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Error::ApiError {
                    status: status_code,
                    message: text,
                }
            }
        }
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}
