//! Human-facing output for CI logs.
//!
//! Progress and success lines go to stdout and disappear under `--quiet`.
//! Warnings and errors go to stderr unconditionally. Results that scripts
//! consume (branch names, PR URLs) are printed bare by [`essential`].

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    const fn to_stderr(self) -> bool {
        matches!(self, Self::Warn | Self::Error)
    }

    fn marker(self) -> String {
        match self {
            Self::Info => "→".blue(),
            Self::Success => "✓".green(),
            Self::Warn => "!".yellow(),
            Self::Error => "✗".red(),
        }
        .to_string()
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

/// The line to print for `msg`, or `None` when `quiet` hides it.
fn render(level: Level, msg: &str, quiet: bool) -> Option<String> {
    if quiet && !level.to_stderr() {
        return None;
    }
    Some(format!("{} {msg}", level.marker()))
}

fn emit(level: Level, msg: &str) {
    let Some(line) = render(level, msg, QUIET_MODE.load(Ordering::Relaxed)) else {
        return;
    };
    if level.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn success(msg: &str) {
    emit(Level::Success, msg);
}

pub fn error(msg: &str) {
    emit(Level::Error, msg);
}

pub fn warn(msg: &str) {
    emit(Level::Warn, msg);
}

/// Progress note, e.g. which PR is being benchmarked.
pub fn info(msg: &str) {
    emit(Level::Info, msg);
}

/// A result line without decoration, printed even under `--quiet`.
pub fn essential(msg: &str) {
    println!("{msg}");
}
