//! Running a built dev server until it exits or the operator interrupts it.

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Duration;

use tracing::info;

use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::process::command_line;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a dev-server run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The server exited successfully on its own.
    Exited,
    /// The operator interrupted the run and the server was stopped.
    Interrupted,
}

/// True if the child was killed by SIGINT.
#[cfg(unix)]
fn killed_by_sigint(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(2)
}

#[cfg(not(unix))]
fn killed_by_sigint(_status: &ExitStatus) -> bool {
    false
}

/// Runs `binary` with `working_dir` as its current directory.
///
/// The working directory is passed to the child only; the calling process
/// never changes its own. A relative `binary` is resolved against the
/// calling process's directory, not `working_dir`.
pub fn run_dev_server(
    binary: &Path,
    working_dir: &Path,
    args: &[String],
    interrupt: &Interrupt,
) -> Result<ServeOutcome> {
    if !binary.is_file() {
        return Err(Error::MissingEntry(binary.to_path_buf()));
    }

    let tool = binary
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.display().to_string());

    let binary = std::path::absolute(binary).map_err(|e| Error::fs("resolve", binary, e))?;
    let mut command = Command::new(&binary);
    command.args(args).current_dir(working_dir);
    info!("Starting {} in {}", tool, working_dir.display());

    let mut child = command.spawn().map_err(|source| Error::ToolSpawn {
        tool: tool.clone(),
        source,
    })?;

    loop {
        let status = child.try_wait().map_err(|source| Error::ToolSpawn {
            tool: tool.clone(),
            source,
        })?;

        match status {
            Some(status) if interrupt.is_triggered() || killed_by_sigint(&status) => {
                info!("Shutting down server");
                return Ok(ServeOutcome::Interrupted);
            }
            Some(status) if status.success() => return Ok(ServeOutcome::Exited),
            Some(status) => {
                return Err(Error::ToolFailed {
                    tool,
                    status: status.to_string(),
                    command: command_line(&command),
                });
            }
            None if interrupt.is_triggered() => {
                info!("Shutting down server");
                // The child may already be exiting from the same signal.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(ServeOutcome::Interrupted);
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    }
}
