//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command borrows the shared
//! [`CommandContext`]: the session repository, the git client, the process
//! launcher and the working directory used for default paths.
//!
//! Shared prompt helpers live in [`input`], shared output in [`display`].

pub mod backup;
pub mod clone;
pub mod completions;
pub mod delete;
pub mod dispatcher;
pub mod display;
pub mod doctor;
pub mod edit;
pub mod export;
pub mod favorite;
pub mod import;
pub mod info;
pub mod init;
pub mod input;
pub mod list;
pub mod quick;
pub mod restore;
pub mod settings;
pub mod start;
pub mod stats;
pub mod stop;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
