//! Launching applications and sampling them with `nperf`.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use crate::command::{self, describe};
use crate::error::{Error, Result};

/// Time an application gets to start (or crash) before it is inspected.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// An application started for profiling.
#[derive(Debug)]
pub struct LaunchedApp {
    child: Child,
    pid: u32,
    command: String,
}

impl LaunchedApp {
    /// Pid of the process to sample.
    ///
    /// May differ from the spawned child when the command is a wrapper that
    /// re-executes the real program (containers, shell scripts).
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// The launched command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Kill the application if it is still running and reap it.
    ///
    /// # Errors
    /// Returns error if the process can't be killed or waited for.
    pub fn stop(mut self) -> Result<()> {
        if self.child.try_wait()?.is_none() {
            tracing::debug!(pid = self.child.id(), "stopping profiled application");
            self.child.kill()?;
        }
        self.child.wait()?;
        Ok(())
    }
}

/// Launch the application `name` with the command line `cmd`.
///
/// Output goes to temporary files so a chatty application never blocks on a
/// full pipe.
///
/// # Errors
/// Returns [`Error::EmptyCommand`] for an empty command line,
/// [`Error::AlreadyFinished`] if the application exited successfully right
/// away, and [`Error::LaunchFailed`] with its output if it crashed.
pub fn launch_application(name: &str, cmd: &[String]) -> Result<LaunchedApp> {
    let Some((program, args)) = cmd.split_first() else {
        return Err(Error::EmptyCommand(name.to_string()));
    };

    let mut stdout = tempfile::tempfile()?;
    let mut stderr = tempfile::tempfile()?;
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout.try_clone()?))
        .stderr(Stdio::from(stderr.try_clone()?));

    let line = describe(&command);
    tracing::info!(app = name, command = %line, "launching application for profiling");
    let mut child = command.spawn()?;

    thread::sleep(STARTUP_GRACE);
    if let Some(status) = child.try_wait()? {
        if status.success() {
            return Err(Error::AlreadyFinished { command: line });
        }
        return Err(Error::LaunchFailed {
            command: line,
            status: status.to_string(),
            stdout: read_all(&mut stdout)?,
            stderr: read_all(&mut stderr)?,
        });
    }

    let pid = find_process_id(cmd, child.id());
    tracing::info!(app = name, pid, child = child.id(), "application running");
    Ok(LaunchedApp {
        child,
        pid,
        command: line,
    })
}

/// Pid of the running process with command line `cmd` closest to `spawned`.
///
/// Falls back to `spawned` when no process matches.
fn find_process_id(cmd: &[String], spawned: u32) -> u32 {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
    );

    system
        .processes()
        .iter()
        .filter(|(_, process)| {
            process
                .cmd()
                .iter()
                .map(|arg| arg.as_os_str())
                .eq(cmd.iter().map(OsStr::new))
        })
        .map(|(pid, _)| pid.as_u32())
        .min_by_key(|pid| pid.abs_diff(spawned))
        .unwrap_or(spawned)
}

fn read_all(file: &mut File) -> Result<String> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

/// Record the process `pid` with `nperf` and render a flame graph.
///
/// The raw data lands in `<prof_dir>/<date>_<name>` and the flame graph
/// next to it with an `.svg` suffix. Recording lasts until the process exits.
///
/// # Errors
/// Returns error if `nperf` fails or the flame graph can't be written.
pub fn nperf(pid: u32, name: &str, prof_dir: &Path, date: &str) -> Result<PathBuf> {
    fs::create_dir_all(prof_dir)?;
    let data = prof_dir.join(format!("{date}_{name}"));

    command::run(
        Command::new("nperf")
            .args(["record", "-p", &pid.to_string(), "-o"])
            .arg(&data),
    )?;

    flamegraph(&data)
}

/// Render `nperf flamegraph <data>` into `<data>.svg`.
fn flamegraph(data: &Path) -> Result<PathBuf> {
    let mut file_name = data.file_name().unwrap_or_default().to_os_string();
    file_name.push(".svg");
    let svg = data.with_file_name(file_name);

    let rendered = command::output(Command::new("nperf").arg("flamegraph").arg(data))?;
    fs::write(&svg, rendered)?;

    tracing::info!(path = %svg.display(), "generated flame graph");
    Ok(svg)
}
