//! Error types for GitHub API operations.

use thiserror::Error;

/// Result type alias for GitHub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport or decoding failure from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected (401).
    #[error("GitHub authentication failed - check your token")]
    AuthenticationFailed,

    /// The rate limit was exhausted (403 with no remaining requests).
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// Any other non-success response.
    #[error("GitHub API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The request was rejected locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An explicitly requested token source produced no token.
    #[error("GitHub token unavailable: {0}")]
    TokenUnavailable(String),
}
