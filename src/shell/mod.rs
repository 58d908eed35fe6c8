//! Shell command execution.

pub mod command;
pub mod platform;

pub use command::{execute, spawn_detached, CommandOptions, ExecOutput};
pub use platform::{is_ci, shell_executable};
