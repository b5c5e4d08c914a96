//! `ghrest pr` commands.

use anyhow::{Context, Result};
use colored::Colorize;
use ghrest_github::{CreatePullRequest, MergePullRequest, PullRequest, PullRequestState};

use super::PrCommand;
use super::utils::{github_repository, print_json};
use crate::output;

/// Run a pull request command.
pub fn run(command: PrCommand, repo: Option<&str>, json: bool) -> Result<()> {
    let repository = github_repository(repo)?;
    let rt = tokio::runtime::Runtime::new()?;

    match command {
        PrCommand::List => {
            let prs = rt.block_on(repository.list_pull_requests())?;
            if json {
                return print_json(&prs);
            }
            if prs.is_empty() {
                output::info("No open pull requests");
            }
            for pr in &prs {
                output::essential(&format_pr(pr));
            }
        }
        PrCommand::Files { number } => {
            let files = rt.block_on(repository.list_pull_request_files(number))?;
            if json {
                return print_json(&files);
            }
            for file in &files {
                output::essential(&format!(
                    "{:<9} {} {}",
                    file.status,
                    file.filename,
                    format!("+{} -{}", file.additions, file.deletions).dimmed()
                ));
            }
        }
        PrCommand::Create {
            head,
            base,
            title,
            body,
            draft,
        } => {
            let mut request = CreatePullRequest::new(&head, &base, title);
            request.body = body;
            request.draft = draft;

            let pr = rt
                .block_on(repository.create_pull_request(&request))
                .with_context(|| format!("Failed to create PR from {head} into {base}"))?;
            if json {
                return print_json(&pr);
            }
            match pr {
                Some(pr) => {
                    output::success(&format!("PR #{} {}", pr.number, pr.title));
                    output::essential(&pr.html_url);
                }
                None => output::warn(&format!("No PR created - {head} has no changes against {base}")),
            }
        }
        PrCommand::Merge { number, method } => {
            let request = MergePullRequest {
                merge_method: method,
                ..MergePullRequest::default()
            };
            let result = rt
                .block_on(repository.merge_pull_request_with(number, &request))
                .with_context(|| format!("Failed to merge PR #{number}"))?;
            if json {
                return print_json(&result);
            }
            output::success(&format!("Merged PR #{number} ({})", short_sha(&result.sha)));
        }
        PrCommand::HasChange { number, rust } => {
            let changed = if rust {
                rt.block_on(repository.pr_has_rust_change(number))?
            } else {
                rt.block_on(repository.pr_has_change(number, |_| true))?
            };
            if json {
                return print_json(&changed);
            }
            output::essential(&changed.to_string());
        }
    }

    Ok(())
}

fn format_pr(pr: &PullRequest) -> String {
    let state = match pr.state {
        PullRequestState::Open if pr.draft => "draft".dimmed(),
        PullRequestState::Open => "open".green(),
        PullRequestState::Closed => "closed".red(),
        PullRequestState::Merged => "merged".magenta(),
    };
    format!(
        "{} {} {} ({} → {})",
        format!("#{}", pr.number).bold(),
        state,
        pr.title,
        pr.head_branch.cyan(),
        pr.base_branch
    )
}

/// First 7 characters of a commit SHA.
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
