//! `ghrest profile` command - Profile applications and publish flame graphs.

use std::path::Path;

use anyhow::{Context, Result, bail};
use ghrest_actions::profiling::{self, ProfilingOptions};

use super::ProfileArgs;
use super::utils::load_config;
use crate::output;

/// Run the profile command.
pub fn run(args: ProfileArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?.profiling;
    if config.apps.is_empty() {
        bail!(
            "No applications to profile - add them under [profiling.apps] in {}",
            config_path.display()
        );
    }

    let mut opts = ProfilingOptions::from_config(args.repo_dir, &config);
    if let Some(profile) = args.profile {
        opts.profile = profile;
    }
    if let Some(prof_dir) = args.prof_dir {
        opts.prof_dir = prof_dir;
    }
    if let Some(history) = args.history {
        opts.history = history;
    }

    output::info(&format!(
        "Profiling {} ({} build)...",
        opts.apps.keys().cloned().collect::<Vec<_>>().join(", "),
        opts.profile
    ));
    profiling::profiling(&opts).context("Profiling failed")?;
    output::success(&format!("Published flame graphs to {}", opts.prof_dir.display()));

    Ok(())
}
