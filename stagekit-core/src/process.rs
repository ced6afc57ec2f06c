//! Blocking helpers for running external tools.

use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{Error, Result};

/// Renders a command as a single shell-like line for diagnostics.
pub fn command_line(command: &Command) -> String {
    let mut line = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

fn check_status(tool: &str, command: &Command, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: describe(status),
            command: command_line(command),
        })
    }
}

/// Runs `command` with inherited stdio and fails on a non-zero exit.
pub fn run_checked(tool: &str, command: &mut Command) -> Result<()> {
    debug!("Running {}", command_line(command));
    let status = command.status().map_err(|source| Error::ToolSpawn {
        tool: tool.to_string(),
        source,
    })?;
    check_status(tool, command, status)
}

/// Runs `command`, capturing stdout, and fails on a non-zero exit.
pub fn capture_checked(tool: &str, command: &mut Command) -> Result<String> {
    debug!("Running {}", command_line(command));
    let output = command.output().map_err(|source| Error::ToolSpawn {
        tool: tool.to_string(),
        source,
    })?;
    check_status(tool, command, output.status)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
