//! Running external commands.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Render a command line for logs and error messages.
#[must_use]
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command with inherited stdio, failing on a non-zero exit.
///
/// # Errors
/// Returns [`Error::CommandFailed`] on a non-zero exit, or an I/O error if
/// the program can't be spawned.
pub fn run(command: &mut Command) -> Result<()> {
    let line = describe(command);
    tracing::info!(command = %line, "running command");

    let status = command.status()?;
    if status.success() {
        return Ok(());
    }

    Err(Error::CommandFailed {
        command: line,
        status: status.to_string(),
        stderr: String::new(),
    })
}

/// Run a command and capture its standard output.
///
/// Standard error is captured too and included in the error on failure.
///
/// # Errors
/// Returns [`Error::CommandFailed`] on a non-zero exit, or an I/O error if
/// the program can't be spawned.
pub fn output(command: &mut Command) -> Result<Vec<u8>> {
    let line = describe(command);
    tracing::info!(command = %line, "running command");

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    if output.status.success() {
        return Ok(output.stdout);
    }

    Err(Error::CommandFailed {
        command: line,
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Build the Rust project in `repo_dir` with the given cargo profile, silencing warnings.
///
/// # Errors
/// Returns error if `cargo build` fails.
pub fn build_project(repo_dir: &Path, profile: &str) -> Result<()> {
    run(Command::new("cargo")
        .args(["build", "--profile", profile])
        .env("RUSTFLAGS", "-Awarnings")
        .current_dir(repo_dir))
}
