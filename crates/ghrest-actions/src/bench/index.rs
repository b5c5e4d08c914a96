//! Markdown index of published criterion reports.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bench::report::ChangeInterval;
use crate::error::Result;

/// Directory holding the reports of the main development branch.
pub const DEV_DIR: &str = "dev";

/// Name of the generated index file.
pub const INDEX_FILE: &str = "index.md";

/// Default benchmark name: the stem of the report directory.
#[must_use]
pub fn default_benchmark_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A benchmark report directory with its change interval.
#[derive(Debug, Clone)]
struct Report {
    path: PathBuf,
    change: ChangeInterval,
    mean: f64,
}

/// Regenerate `index.md` under `bench_dir`.
///
/// Keeps the newest `history` numbered result directories (0 keeps all) plus
/// `dev`, renames criterion's `history.html` pages to `index.html` so they are
/// served as directory indexes, and writes one section per kept directory.
///
/// # Errors
/// Returns error if the directory can't be read, a report can't be parsed,
/// or the index can't be written.
pub fn generate_index<F>(bench_dir: &Path, history: usize, name_of: F) -> Result<PathBuf>
where
    F: Fn(&Path) -> String,
{
    let dirs = clean_result_dirs(bench_dir, history)?;
    rename_history_reports(&dirs)?;

    let markdown = render_index(bench_dir, &dirs, &name_of)?;
    let index = bench_dir.join(INDEX_FILE);
    fs::write(&index, markdown)?;

    tracing::info!(path = %index.display(), sections = dirs.len(), "generated benchmark index");
    Ok(index)
}

/// Delete all but the newest `history` numbered result directories.
///
/// Returns the kept directories in ascending order, followed by `dev` if present.
fn clean_result_dirs(bench_dir: &Path, history: usize) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/[1-9]*",
        glob::Pattern::escape(&bench_dir.to_string_lossy())
    );

    let mut dirs = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_by(|a, b| compare_result_dirs(a, b));

    let keep_from = if history == 0 {
        0
    } else {
        dirs.len().saturating_sub(history)
    };
    for path in dirs.drain(..keep_from) {
        tracing::info!(path = %path.display(), "removing old benchmark results");
        fs::remove_dir_all(&path)?;
    }

    let dev = bench_dir.join(DEV_DIR);
    if dev.is_dir() {
        dirs.push(dev);
    }
    Ok(dirs)
}

/// Numeric order for numbered directories, name order otherwise.
fn compare_result_dirs(a: &Path, b: &Path) -> Ordering {
    let key = |p: &Path| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.parse::<u64>().ok(), name)
    };
    key(a).cmp(&key(b))
}

/// Rename every `history.html` under `dirs` to `index.html`.
fn rename_history_reports(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        let pattern = format!(
            "{}/**/history.html",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            fs::rename(&path, path.with_file_name("index.html"))?;
        }
    }
    Ok(())
}

fn render_index<F>(bench_dir: &Path, dirs: &[PathBuf], name_of: &F) -> Result<String>
where
    F: Fn(&Path) -> String,
{
    let sections = dirs
        .iter()
        .rev()
        .map(|dir| render_section(bench_dir, dir, name_of))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("# Benchmarks\n{}\n", sections.join("\n")))
}

/// Render the two report lists of one result directory.
fn render_section<F>(bench_dir: &Path, dir: &Path, name_of: &F) -> Result<String>
where
    F: Fn(&Path) -> String,
{
    let reports = load_reports(dir)?;

    let mut by_change = reports.clone();
    // Regressions first
    by_change.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    let links = render_links(bench_dir, &reports, name_of)?;
    let links_sorted = render_links(bench_dir, &by_change, name_of)?;
    let title = section_title(bench_dir, dir);

    Ok(format!(
        "## {title} - Sorted By Performance Change\n{links_sorted}\n## {title} - Sorted By Name\n{links}\n"
    ))
}

/// Report directories under `<dir>/criterion/reports`, sorted by name.
fn load_reports(dir: &Path) -> Result<Vec<Report>> {
    let reports_dir = dir.join("criterion").join("reports");
    if !reports_dir.is_dir() {
        tracing::warn!(path = %reports_dir.display(), "no criterion reports found");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(&reports_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let change = ChangeInterval::from_report(&path).or_else(|err| {
                if path.join("index.html").exists() {
                    Err(err)
                } else {
                    Ok(ChangeInterval::default())
                }
            })?;
            let mean = change.mean_value()?;
            Ok(Report { path, change, mean })
        })
        .collect()
}

fn render_links<F>(bench_dir: &Path, reports: &[Report], name_of: &F) -> Result<String>
where
    F: Fn(&Path) -> String,
{
    let lines = reports
        .iter()
        .map(|report| {
            Ok(format!(
                "- {}  [{}]({}/index.html)",
                report.change.to_markdown()?,
                name_of(&report.path),
                link_path(bench_dir, &report.path)
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Path of a report relative to the index file.
fn link_path(bench_dir: &Path, report: &Path) -> String {
    let relative = report.strip_prefix(bench_dir).unwrap_or(report);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// `bench/12` for `<anything>/bench/12`.
fn section_title(bench_dir: &Path, dir: &Path) -> String {
    let root = bench_dir
        .file_name()
        .map_or_else(|| bench_dir.to_path_buf(), PathBuf::from);
    let relative = dir.strip_prefix(bench_dir).unwrap_or(dir);
    link_path(Path::new(""), &root.join(relative))
}
