//! devflow - Named development sessions you can start with one command.
//!
//! A session bundles a project path, an editor, startup commands,
//! environment variables and a git branch policy. Starting a session syncs
//! the branch, opens the editor and runs the commands, keeping long-running
//! dev servers in the background.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git plumbing behind the [`git::GitClient`] trait
//! - [`interchange`] - Session export files and whole-store backups
//! - [`launch`] - Editor and command spawning behind the [`launch::Launcher`] trait
//! - [`orchestrator`] - The session start sequence
//! - [`session`] - Session records, analytics, settings and the repository
//! - [`shell`] - Shell command execution
//! - [`store`] - Persistent JSON document storage
//! - [`templates`] - Built-in session templates
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use devflow::session::{SessionDraft, SessionRepository};
//! use devflow::store::MemoryStore;
//!
//! let repo = SessionRepository::new(Box::new(MemoryStore::new()));
//! repo.save("api", SessionDraft::default()).unwrap();
//! repo.record_start("api").unwrap();
//! assert_eq!(repo.session_stats("api").unwrap().starts, 1);
//! ```

pub mod cli;
pub mod error;
pub mod git;
pub mod interchange;
pub mod launch;
pub mod orchestrator;
pub mod session;
pub mod shell;
pub mod store;
pub mod templates;
pub mod ui;

pub use error::{DevflowError, Result};
