//! Shell command execution.

use crate::error::{DevflowError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::{is_ci, shell_executable};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables layered over the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

fn shell_command(command: &str, flag: &str, options: &CommandOptions) -> Command {
    let mut cmd = Command::new(shell_executable());
    cmd.arg(flag).arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(&options.env);
    cmd
}

/// Execute a shell command and wait for it.
///
/// A non-zero exit is reported through [`ExecOutput::success`]; only a
/// failure to spawn is an error.
pub fn execute(command: &str, options: &CommandOptions) -> Result<ExecOutput> {
    let start = Instant::now();
    let mut cmd = shell_command(command, shell_flag(is_ci()), options);

    cmd.stdin(Stdio::inherit());
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn `{}`: {}", command, e);
        DevflowError::command_not_started(command, &e)
    })?;

    Ok(ExecOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Spawn a shell command without waiting for it.
///
/// The child inherits stdout and stderr, runs in its own process group so it
/// outlives this process, and is never reaped. Returns the child's PID.
///
/// Stdin is closed and the shell is never interactive: a shell outside the
/// foreground process group is stopped by SIGTTIN/SIGTTOU as soon as it
/// touches the terminal. Version managers set up only in interactive rc
/// files are therefore not on `PATH` for detached commands.
pub fn spawn_detached(command: &str, options: &CommandOptions) -> Result<u32> {
    let mut cmd = shell_command(command, shell_flag(true), options);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

    let child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn `{}`: {}", command, e);
        DevflowError::command_not_started(command, &e)
    })?;

    tracing::debug!("Spawned `{}` as pid {}", command, child.id());
    Ok(child.id())
}

/// Get the flag to pass commands to the shell.
///
/// Uses `-lic` (interactive login shell) on Unix so version managers set up
/// in the user's rc files are on `PATH`. Without a controlling terminal, as
/// in CI or for detached commands, uses `-lc` since `-i` fails to set up job
/// control.
fn shell_flag(no_terminal: bool) -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else if no_terminal {
        "-lc"
    } else {
        "-lic"
    }
}
