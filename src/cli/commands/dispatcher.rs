//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the collaborators every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::Commands;
use crate::error::Result;
use crate::git::{GitClient, SystemGit};
use crate::launch::{Launcher, SystemLauncher};
use crate::session::SessionRepository;
use crate::store::JsonFileStore;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Collaborators shared by every command.
pub struct CommandContext {
    pub repository: SessionRepository,
    pub git: Box<dyn GitClient>,
    pub launcher: Box<dyn Launcher>,
    /// Directory used for default paths (init, clone, export, backup).
    pub cwd: PathBuf,
}

impl CommandContext {
    /// Context backed by the JSON store at `store_path` and the real git
    /// and shell.
    pub fn system(store_path: PathBuf, cwd: PathBuf) -> Self {
        Self {
            repository: SessionRepository::new(Box::new(JsonFileStore::new(store_path))),
            git: Box::new(SystemGit::new()),
            launcher: Box::new(SystemLauncher::new()),
            cwd,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, command: &Commands, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = &self.context;
        match command {
            Commands::Init(args) => super::init::InitCommand::new(ctx, args.clone()).execute(ui),
            Commands::List(args) => super::list::ListCommand::new(ctx, args.clone()).execute(ui),
            Commands::Start(args) => {
                super::start::StartCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Stop(args) => super::stop::StopCommand::new(args.clone()).execute(ui),
            Commands::Edit(args) => super::edit::EditCommand::new(ctx, args.clone()).execute(ui),
            Commands::Delete(args) => {
                super::delete::DeleteCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Info(args) => super::info::InfoCommand::new(ctx, args.clone()).execute(ui),
            Commands::Clone(args) => {
                super::clone::CloneCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Favorite(args) => {
                super::favorite::FavoriteCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Stats(args) => {
                super::stats::StatsCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Export(args) => {
                super::export::ExportCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Import(args) => {
                super::import::ImportCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Backup(args) => {
                super::backup::BackupCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Restore(args) => {
                super::restore::RestoreCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Doctor => super::doctor::DoctorCommand::new(ctx).execute(ui),
            Commands::Settings(args) => {
                super::settings::SettingsCommand::new(ctx, args.clone()).execute(ui)
            }
            Commands::Quick => super::quick::QuickCommand::new(ctx).execute(ui),
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Context builder for command tests.

    use super::*;
    use crate::git::fake::FakeGit;
    use crate::launch::fake::FakeLauncher;
    use crate::store::MemoryStore;

    pub fn context(cwd: &Path) -> CommandContext {
        context_with(cwd, FakeGit::default(), FakeLauncher::default())
    }

    pub fn context_with(cwd: &Path, git: FakeGit, launcher: FakeLauncher) -> CommandContext {
        CommandContext {
            repository: SessionRepository::new(Box::new(MemoryStore::new())),
            git: Box::new(git),
            launcher: Box::new(launcher),
            cwd: cwd.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::StatsArgs;
    use crate::ui::MockUI;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatches_to_command() {
        let temp = tempfile::TempDir::new().unwrap();
        let dispatcher = CommandDispatcher::new(testing::context(temp.path()));
        let mut ui = MockUI::new();

        let result = dispatcher
            .dispatch(&Commands::Stats(StatsArgs { json: true }), &mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.outputs().len(), 1);
        assert_eq!(dispatcher.context().cwd(), temp.path());
    }
}
