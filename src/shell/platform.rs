//! Platform-specific shell detection.

use std::ffi::OsString;
use std::path::PathBuf;

/// Variables whose presence marks a CI run.
const CI_VARS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Get the user's shell executable.
pub fn shell_executable() -> PathBuf {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
    } else {
        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()` and to pick a shell flag
/// that does not need a TTY. Checks `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`,
/// `CIRCLECI`, `TRAVIS` and `JENKINS_URL`.
pub fn is_ci() -> bool {
    ci_detected(|var| std::env::var_os(var))
}

fn ci_detected(lookup: impl Fn(&str) -> Option<OsString>) -> bool {
    CI_VARS.iter().any(|var| lookup(var).is_some())
}
