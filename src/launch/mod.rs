//! Process launching for session start.
//!
//! [`Launcher`] covers the three kinds of process a session start creates:
//! the editor, blocking setup commands and detached long-running commands.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{DevflowError, Result};
use crate::session::Editor;
use crate::shell::{self, CommandOptions};

/// A process left running in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedProcess {
    pub pid: u32,
}

/// Launches editors and session commands.
pub trait Launcher {
    /// Open `path` in `editor` without waiting for it.
    fn open_editor(&self, editor: Editor, path: &Path, new_window: bool) -> Result<()>;

    /// Run a command to completion with inherited stdio.
    ///
    /// Fails with [`DevflowError::CommandFailed`] on spawn failure or a
    /// non-zero exit.
    fn run_blocking(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<()>;

    /// Start a command in the background with inherited stdio.
    fn spawn_detached(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<SpawnedProcess>;
}

/// Launcher that runs commands through the user's shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }

    fn options(cwd: &Path, env: &BTreeMap<String, String>) -> CommandOptions {
        CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            env: env.clone(),
            capture_stdout: false,
            capture_stderr: false,
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_editor(&self, editor: Editor, path: &Path, new_window: bool) -> Result<()> {
        let mut cmd = Command::new(editor.executable());
        if let Some(flag) = editor.window_flag(new_window) {
            cmd.arg(flag);
        }
        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

        cmd.spawn().map_err(|e| {
            tracing::debug!("Failed to launch {}: {}", editor.executable(), e);
            DevflowError::command_not_started(
                format!("{} {}", editor.executable(), path.display()),
                &e,
            )
        })?;
        Ok(())
    }

    fn run_blocking(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<()> {
        let output = shell::execute(command, &Self::options(cwd, env))?;
        if output.success {
            Ok(())
        } else {
            Err(DevflowError::command_exited(command, output.exit_code))
        }
    }

    fn spawn_detached(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<SpawnedProcess> {
        let pid = shell::spawn_detached(command, &Self::options(cwd, env))?;
        Ok(SpawnedProcess { pid })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn run_blocking_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let err = SystemLauncher::new()
            .run_blocking("exit 7", temp.path(), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DevflowError::CommandFailed { code: Some(7), .. }
        ));
        assert!(err.to_string().ends_with("exited with code 7"));
    }

    #[test]
    fn run_blocking_in_missing_dir_reports_os_error() {
        let err = SystemLauncher::new()
            .run_blocking("echo hi", Path::new("/definitely/not/here"), &BTreeMap::new())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("could not start"));
        assert!(message.contains("No such file"));
    }

    #[test]
    fn run_blocking_passes_env_and_cwd() {
        let temp = TempDir::new().unwrap();
        let mut env = BTreeMap::new();
        env.insert("DEVFLOW_MARK".to_string(), "ok".to_string());

        SystemLauncher::new()
            .run_blocking("echo $DEVFLOW_MARK > out.txt", temp.path(), &env)
            .unwrap();

        let written = std::fs::read_to_string(temp.path().join("out.txt")).unwrap();
        assert_eq!(written.trim(), "ok");
    }

    #[test]
    fn spawn_detached_does_not_wait() {
        let temp = TempDir::new().unwrap();
        let start = std::time::Instant::now();
        let spawned = SystemLauncher::new()
            .spawn_detached("sleep 5", temp.path(), &BTreeMap::new())
            .unwrap();
        assert!(spawned.pid > 0);
        assert!(start.elapsed().as_secs() < 5);
    }
}
