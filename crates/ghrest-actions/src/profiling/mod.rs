//! Profile long-running applications with `nperf` and publish flame graphs
//! to `gh-pages`.

pub mod process;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};
use ghrest_git::Repository;

pub use process::{LaunchedApp, launch_application, nperf};

use crate::GH_PAGES;
use crate::command::build_project;
use crate::config::ProfilingConfig;
use crate::error::Result;

const BOT_NAME: &str = "profiling-bot";
const BOT_EMAIL: &str = "profiling-bot@github.com";

/// Inputs of [`profiling`].
#[derive(Debug, Clone)]
pub struct ProfilingOptions {
    /// Root of the local checkout.
    pub repo_dir: PathBuf,
    /// Applications to profile: name to command line.
    pub apps: BTreeMap<String, Vec<String>>,
    /// Cargo profile used to build the applications.
    pub profile: String,
    /// Directory for flame graphs on `gh-pages`, relative to `repo_dir`.
    pub prof_dir: PathBuf,
    /// Days of flame graphs to keep.
    pub history: u32,
}

impl ProfilingOptions {
    /// Options taken from the `[profiling]` config section.
    pub fn from_config(repo_dir: impl Into<PathBuf>, config: &ProfilingConfig) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            apps: config.apps.clone(),
            profile: config.profile.clone(),
            prof_dir: config.prof_dir.clone(),
            history: config.history,
        }
    }
}

/// Build the project, profile every application, and push the flame graphs.
///
/// Pushes `gh-pages` directly; if that is rejected the results are pushed to
/// `gh-pages_prof_<YYYYmmdd>` and [`ghrest_git::Error::PushRejected`] is
/// returned.
///
/// # Errors
/// Returns error if the build, an application, `nperf`, or a git operation fails.
pub fn profiling(opts: &ProfilingOptions) -> Result<()> {
    ghrest_git::configure_identity(&opts.repo_dir, BOT_EMAIL, BOT_NAME)?;
    build_project(&opts.repo_dir, &opts.profile)?;

    let today = Local::now().date_naive();
    let date = today.format("%Y%m%d").to_string();
    let prof_dir = opts.repo_dir.join(&opts.prof_dir);

    for (name, cmd) in &opts.apps {
        let app = launch_application(name, cmd)?;
        let svg = nperf(app.pid(), name, &prof_dir, &date)?;
        app.stop()?;
        tracing::info!(app = %name, svg = %svg.display(), "profiled application");
    }

    let repo = Repository::open(&opts.repo_dir)?;
    repo.switch_branch(GH_PAGES, true)?;
    prune_and_index(&prof_dir, &cutoff(today, opts.history))?;
    repo.commit_paths(&[&opts.prof_dir], "update profiling results")?;
    repo.push_with_fallback(GH_PAGES, Some(&format!("{GH_PAGES}_prof_{date}")))?;
    Ok(())
}

/// `YYYYmmdd` of `today - history` days. Flame graphs not newer than this are dropped.
#[must_use]
pub fn cutoff(today: NaiveDate, history: u32) -> String {
    today
        .checked_sub_days(Days::new(u64::from(history)))
        .unwrap_or(NaiveDate::MIN)
        .format("%Y%m%d")
        .to_string()
}

/// Clean up `prof_dir` and write its `index.md`.
///
/// Removes raw `nperf` data (files without an extension) and flame graphs
/// whose name doesn't sort after `cutoff`.
///
/// # Errors
/// Returns error if the directory can't be read or files can't be removed.
pub fn prune_and_index(prof_dir: &Path, cutoff: &str) -> Result<PathBuf> {
    fs::create_dir_all(prof_dir)?;

    for entry in fs::read_dir(prof_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_none() {
            fs::remove_file(&path)?;
        }
    }

    let pattern = format!("{}/*.svg", glob::Pattern::escape(&prof_dir.to_string_lossy()));
    let svgs = glob::glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    let (mut keep, stale): (Vec<PathBuf>, Vec<PathBuf>) =
        svgs.into_iter().partition(|svg| file_name(svg).as_str() > cutoff);

    for svg in stale {
        tracing::debug!(path = %svg.display(), "removing old flame graph");
        fs::remove_file(&svg)?;
    }

    keep.sort_by(|a, b| b.cmp(a));
    let index = prof_dir.join("index.md");
    fs::write(&index, index_markdown(&keep))?;

    tracing::info!(path = %index.display(), graphs = keep.len(), "generated profiling index");
    Ok(index)
}

/// `# Profiling` followed by one link per flame graph, in the given order.
#[must_use]
pub fn index_markdown(svgs: &[PathBuf]) -> String {
    let links = svgs
        .iter()
        .map(|svg| {
            let svg = file_name(svg);
            let date = svg.get(..8).unwrap_or_default();
            let name = svg
                .len()
                .checked_sub(4)
                .and_then(|end| svg.get(9..end))
                .unwrap_or_default();
            format!("- [{name} - {date}]({svg})")
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("# Profiling\n{links}")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
