//! Token resolution for the GitHub client.

use std::process::Command;

use secrecy::SecretString;

use crate::error::{Error, Result};

/// Environment variables checked by [`Auth::auto`], in order.
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Where the GitHub token comes from.
#[derive(Debug, Clone)]
pub enum Auth {
    /// A token supplied directly.
    Token(SecretString),
    /// A token read from the named environment variable.
    EnvVar(String),
    /// A token obtained from `gh auth token`.
    GhCli,
    /// No token at all. Public endpoints only, with a low rate limit.
    Anonymous,
}

impl Auth {
    /// Pick the first available source.
    ///
    /// Checks `GITHUB_TOKEN`, then `GH_TOKEN`, then the `gh` CLI, and falls
    /// back to anonymous access when none of them yields a token. A token
    /// from the `gh` CLI is kept as [`Auth::Token`] so it is fetched once.
    #[must_use]
    pub fn auto() -> Self {
        Self::detect(|var| std::env::var(var).ok(), gh_cli_token)
    }

    fn detect(env: impl Fn(&str) -> Option<String>, gh: impl FnOnce() -> Option<String>) -> Self {
        for var in TOKEN_ENV_VARS {
            if env(var).is_some_and(|v| !v.trim().is_empty()) {
                return Self::EnvVar(var.to_string());
            }
        }

        if let Some(token) = gh() {
            tracing::debug!("using the gh CLI token");
            return Self::Token(SecretString::from(token));
        }

        tracing::debug!("no GitHub token found, using anonymous access");
        Self::Anonymous
    }

    /// Resolve the token.
    ///
    /// Returns `Ok(None)` for [`Auth::Anonymous`] and for an empty direct token.
    ///
    /// # Errors
    /// Returns [`Error::TokenUnavailable`] if an env var or the `gh` CLI was
    /// requested explicitly but yields nothing.
    pub fn resolve(&self) -> Result<Option<SecretString>> {
        use secrecy::ExposeSecret;

        match self {
            Self::Token(token) => {
                if token.expose_secret().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.clone()))
                }
            }
            Self::EnvVar(var) => std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| Some(SecretString::from(v)))
                .ok_or_else(|| {
                    Error::TokenUnavailable(format!("environment variable {var} is not set"))
                }),
            Self::GhCli => gh_cli_token()
                .map(|v| Some(SecretString::from(v)))
                .ok_or_else(|| Error::TokenUnavailable("`gh auth token` failed".into())),
            Self::Anonymous => Ok(None),
        }
    }
}

/// Ask the `gh` CLI for its token.
fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_direct_token_resolves() {
        let auth = Auth::Token(SecretString::from("abc123"));
        let token = auth.resolve().unwrap().unwrap();
        assert_eq!(token.expose_secret(), "abc123");
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let auth = Auth::Token(SecretString::from(""));
        assert!(auth.resolve().unwrap().is_none());
    }

    #[test]
    fn test_anonymous_has_no_token() {
        assert!(Auth::Anonymous.resolve().unwrap().is_none());
    }

    #[test]
    fn test_missing_env_var_is_error() {
        let auth = Auth::EnvVar("GHREST_TEST_TOKEN_THAT_IS_NEVER_SET".into());
        assert!(matches!(auth.resolve(), Err(Error::TokenUnavailable(_))));
    }

    #[test]
    fn test_detect_prefers_github_token() {
        let env = |var: &str| match var {
            "GITHUB_TOKEN" => Some("from-actions".to_string()),
            "GH_TOKEN" => Some("from-gh-env".to_string()),
            _ => None,
        };
        let auth = Auth::detect(env, || panic!("gh must not run when an env var is set"));
        assert!(matches!(auth, Auth::EnvVar(var) if var == "GITHUB_TOKEN"));
    }

    #[test]
    fn test_detect_skips_blank_env_vars() {
        let env = |var: &str| match var {
            "GITHUB_TOKEN" => Some("  ".to_string()),
            "GH_TOKEN" => Some("from-gh-env".to_string()),
            _ => None,
        };
        let auth = Auth::detect(env, || None);
        assert!(matches!(auth, Auth::EnvVar(var) if var == "GH_TOKEN"));
    }

    #[test]
    fn test_detect_keeps_gh_cli_token() {
        let calls = std::cell::Cell::new(0);
        let auth = Auth::detect(
            |_| None,
            || {
                calls.set(calls.get() + 1);
                Some("gho_cli".to_string())
            },
        );

        let token = auth.resolve().unwrap().unwrap();
        assert_eq!(token.expose_secret(), "gho_cli");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_detect_falls_back_to_anonymous() {
        let auth = Auth::detect(|_| None, || None);
        assert!(matches!(auth, Auth::Anonymous));
        assert!(auth.resolve().unwrap().is_none());
    }
}
