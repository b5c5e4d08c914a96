//! `ghrest org` commands.

use anyhow::Result;
use colored::Colorize;

use super::OrgCommand;
use super::utils::{github_client, print_json};
use crate::output;

/// Run an organization command.
pub fn run(command: OrgCommand, json: bool) -> Result<()> {
    let client = github_client()?;
    let rt = tokio::runtime::Runtime::new()?;

    match command {
        OrgCommand::Repos { org, kind } => {
            let repos = rt.block_on(client.organization(&org).list_repositories(kind))?;
            if json {
                return print_json(&repos);
            }
            if repos.is_empty() {
                output::info(&format!("No {kind} repositories in {org}"));
            }
            for repo in &repos {
                let mut flags = Vec::new();
                if repo.private {
                    flags.push("private");
                }
                if repo.fork {
                    flags.push("fork");
                }
                if repo.archived {
                    flags.push("archived");
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" {}", format!("[{}]", flags.join(", ")).dimmed())
                };
                output::essential(&format!("{}{flags}", repo.full_name));
            }
        }
    }

    Ok(())
}
