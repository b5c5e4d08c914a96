use std::path::Path;

use anyhow::{Context, Result, bail};
use ghrest_actions::Config;
use ghrest_github::{Auth, GitHubClient};
use serde::Serialize;

/// Resolve `owner/name` from `--repo`/`GITHUB_REPOSITORY` or the origin remote.
pub fn resolve_repo(repo: Option<&str>) -> Result<(String, String)> {
    if let Some(slug) = repo.map(str::trim).filter(|s| !s.is_empty()) {
        return parse_slug(slug);
    }

    let local = ghrest_git::Repository::open_current()
        .context("Not inside a git repository - pass --repo owner/name")?;
    let origin_url = local.origin_url()?;
    Ok(ghrest_git::Repository::parse_github_remote(&origin_url)?)
}

fn parse_slug(slug: &str) -> Result<(String, String)> {
    match slug.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => bail!("Invalid repository '{slug}' - expected owner/name"),
    }
}

/// Open the GitHub repository the command operates on.
pub fn github_repository(repo: Option<&str>) -> Result<ghrest_github::Repository> {
    let (owner, name) = resolve_repo(repo)?;
    let client = github_client()?;
    Ok(client.repository(owner, name))
}

/// A client authenticated with the first available token.
pub fn github_client() -> Result<GitHubClient> {
    let client = GitHubClient::new(&Auth::auto())?;
    if !client.is_authenticated() {
        tracing::warn!("no GitHub token found - set GITHUB_TOKEN or run `gh auth login`");
    }
    Ok(client)
}

/// Load the config file, falling back to defaults when it doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug() {
        assert_eq!(
            parse_slug("rust-lang/cargo").unwrap(),
            ("rust-lang".to_string(), "cargo".to_string())
        );
        assert!(parse_slug("cargo").is_err());
        assert!(parse_slug("/cargo").is_err());
        assert!(parse_slug("rust-lang/").is_err());
        assert!(parse_slug("a/b/c").is_err());
    }

    #[test]
    fn test_explicit_repo_wins() {
        assert_eq!(
            resolve_repo(Some(" owner/name ")).unwrap(),
            ("owner".to_string(), "name".to_string())
        );
    }
}
