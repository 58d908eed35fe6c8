//! Error types for devflow operations.
//!
//! This module defines [`DevflowError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Store and file system failures abort the current command
//! - Validation, not-found and malformed-file errors abort with a distinct exit code
//! - Git and command failures during `start` never surface here; the
//!   orchestrator turns them into warnings
//! - Use `anyhow::Error` (via `DevflowError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for generic failures (store I/O and anything unexpected).
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when a session, file or last-used session is missing.
pub const EXIT_NOT_FOUND: i32 = 2;
/// Exit code when session validation fails.
pub const EXIT_VALIDATION: i32 = 3;
/// Exit code when an input file cannot be parsed.
pub const EXIT_INVALID_FORMAT: i32 = 4;

/// Core error type for devflow operations.
#[derive(Debug, Error)]
pub enum DevflowError {
    /// Referenced session does not exist.
    #[error("Session \"{name}\" not found")]
    SessionNotFound { name: String },

    /// No session name given and nothing recorded as last used.
    #[error("No session specified and no last used session found")]
    NoSessionSelected,

    /// An input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Template key is not in the catalog.
    #[error("Unknown template \"{name}\"")]
    UnknownTemplate { name: String },

    /// A session file parsed but lacks required fields.
    #[error("Invalid session file format! Required fields: name, path ({path})")]
    MissingFields { path: PathBuf },

    /// A session draft failed validation.
    #[error("Invalid session configuration:\n  - {}", errors.join("\n  - "))]
    Validation { errors: Vec<String> },

    /// An input file is not valid JSON or lacks required structure.
    #[error("Invalid file format: {path}: {message}")]
    InvalidFileFormat { path: PathBuf, message: String },

    /// The persistent store could not be read or written.
    #[error("Store error at {path}: {message}")]
    Store { path: PathBuf, message: String },

    /// A prompt could not be answered.
    #[error("Cannot prompt for '{key}': {message}")]
    Prompt { key: String, message: String },

    /// Shell command could not be started or exited non-zero.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        reason: String,
    },

    /// Git operation failed outside of the start sequence.
    #[error(transparent)]
    Git(#[from] crate::git::GitError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevflowError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SessionNotFound { .. }
            | Self::NoSessionSelected
            | Self::FileNotFound { .. }
            | Self::UnknownTemplate { .. } => EXIT_NOT_FOUND,
            Self::Validation { .. } | Self::MissingFields { .. } => EXIT_VALIDATION,
            Self::InvalidFileFormat { .. } => EXIT_INVALID_FORMAT,
            _ => EXIT_FAILURE,
        }
    }

    /// A command ran and exited unsuccessfully.
    pub fn command_exited(command: impl Into<String>, code: Option<i32>) -> Self {
        let reason = match code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by a signal".to_string(),
        };
        Self::CommandFailed {
            command: command.into(),
            code,
            reason,
        }
    }

    /// A command could not be started at all.
    pub fn command_not_started(command: impl Into<String>, err: &std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code: None,
            reason: format!("could not start: {}", err),
        }
    }
}

/// Result type alias for devflow operations.
pub type Result<T> = std::result::Result<T, DevflowError>;
