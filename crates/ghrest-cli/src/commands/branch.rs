//! `ghrest branch` commands.

use anyhow::{Context, Result};
use colored::Colorize;

use super::BranchCommand;
use super::pr::short_sha;
use super::utils::{github_repository, print_json};
use crate::output;

/// Run a branch command.
pub fn run(command: BranchCommand, repo: Option<&str>, json: bool) -> Result<()> {
    let repository = github_repository(repo)?;
    let rt = tokio::runtime::Runtime::new()?;

    match command {
        BranchCommand::List => {
            let branches = rt.block_on(repository.list_branches())?;
            if json {
                return print_json(&branches);
            }
            for branch in &branches {
                let lock = if branch.protected { " 🔒" } else { "" };
                output::essential(&format!(
                    "{} {}{lock}",
                    short_sha(&branch.sha).dimmed(),
                    branch.name
                ));
            }
        }
        BranchCommand::Delete { name } => {
            rt.block_on(repository.delete_branch(&name))
                .with_context(|| format!("Failed to delete branch {name}"))?;
            output::success(&format!("Deleted {name}"));
        }
        BranchCommand::Update { branch, upstream } => {
            output::info(&format!("Merging {upstream} into {branch}..."));
            let result = rt
                .block_on(repository.update_branch(&branch, &upstream))
                .with_context(|| format!("Failed to update {branch} from {upstream}"))?;
            if json {
                return print_json(&result);
            }
            match result {
                Some(result) => output::success(&format!(
                    "Merged {upstream} into {branch} ({})",
                    short_sha(&result.sha)
                )),
                None => output::info(&format!("{branch} is already up to date with {upstream}")),
            }
        }
    }

    Ok(())
}
