//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::interchange::RestoreStrategy;

/// devflow - Named development sessions you can start with one command.
#[derive(Debug, Parser)]
#[command(name = "devflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the session store (overrides the per-user config file)
    #[arg(long, global = true, env = "DEVFLOW_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; use flags, DEVFLOW_PROMPT_* variables or defaults
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new session
    Init(InitArgs),

    /// List all sessions
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Start a session (defaults to the last used one)
    Start(StartArgs),

    /// Show how to stop a running session
    Stop(StopArgs),

    /// Edit a session
    Edit(EditArgs),

    /// Delete a session
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Show details for a session (defaults to the last used one)
    Info(InfoArgs),

    /// Clone a repository and create a session for it
    Clone(CloneArgs),

    /// Toggle a session as favorite
    #[command(visible_alias = "fav")]
    Favorite(FavoriteArgs),

    /// Show usage statistics
    Stats(StatsArgs),

    /// Export a session to a file
    Export(ExportArgs),

    /// Import a session from a file
    Import(ImportArgs),

    /// Back up all sessions to a file
    Backup(BackupArgs),

    /// Restore sessions from a backup file
    Restore(RestoreArgs),

    /// Check sessions for problems
    #[command(visible_alias = "check")]
    Doctor,

    /// View or change settings
    #[command(visible_alias = "config")]
    Settings(SettingsArgs),

    /// Pick a session from favorites and recent ones, then start it
    #[command(visible_alias = "q")]
    Quick,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Session name (defaults to the current directory name)
    pub name: Option<String>,

    /// Project path
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Editor to open (code, cursor, webstorm, sublime, atom or none)
    #[arg(long)]
    pub editor: Option<String>,

    /// Template to start from
    #[arg(long)]
    pub template: Option<String>,

    /// Startup command (repeatable)
    #[arg(long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Git branch to switch to on start
    #[arg(long)]
    pub branch: Option<String>,

    /// Environment variable as KEY=value (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Overwrite an existing session without asking
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `start` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StartArgs {
    /// Session to start
    pub name: Option<String>,
}

/// Arguments for the `stop` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StopArgs {
    /// Session to stop
    pub name: Option<String>,
}

/// Arguments for the `edit` command.
///
/// With no field flags the command asks which field to edit.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EditArgs {
    /// Session to edit
    pub name: Option<String>,

    /// New project path
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// New editor (or none)
    #[arg(long)]
    pub editor: Option<String>,

    /// Replace the commands (repeatable)
    #[arg(long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// New git branch (empty to clear)
    #[arg(long)]
    pub branch: Option<String>,

    /// Replace the environment with KEY=value pairs (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,
}

impl EditArgs {
    /// Whether any field flag was given.
    pub fn has_updates(&self) -> bool {
        self.path.is_some()
            || self.editor.is_some()
            || !self.commands.is_empty()
            || self.branch.is_some()
            || !self.env.is_empty()
    }
}

/// Arguments for the `delete` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeleteArgs {
    /// Session to delete
    pub name: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Session to show
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clone` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CloneArgs {
    /// Repository URL
    pub url: Option<String>,
}

/// Arguments for the `favorite` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FavoriteArgs {
    /// Session to toggle
    pub name: Option<String>,
}

/// Arguments for the `stats` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ExportArgs {
    /// Session to export
    pub name: Option<String>,

    /// Output file (defaults to ./<name>.devflow.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `import` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ImportArgs {
    /// Session file to import
    pub file: Option<PathBuf>,

    /// Import under this name
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the stored project path
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing session with the same name
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `backup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BackupArgs {
    /// Output file (defaults to ./devflow-backup-<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `restore` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RestoreArgs {
    /// Backup file to restore
    pub file: Option<PathBuf>,

    /// How to handle sessions that already exist
    #[arg(long, value_enum)]
    pub strategy: Option<RestoreStrategy>,
}

/// Arguments for the `settings` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SettingsArgs {
    /// Set a value, e.g. autoGitPull=true (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Reset all settings to defaults
    #[arg(long, conflicts_with = "set")]
    pub reset: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn aliases_resolve() {
        let cli = Cli::try_parse_from(["devflow", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::List(_)));

        let cli = Cli::try_parse_from(["devflow", "rm", "api", "--yes"]).unwrap();
        match cli.command {
            Commands::Delete(args) => {
                assert_eq!(args.name.as_deref(), Some("api"));
                assert!(args.yes);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["devflow", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor));
    }

    #[test]
    fn init_flags_are_repeatable() {
        let cli = Cli::try_parse_from([
            "devflow",
            "init",
            "api",
            "--command",
            "npm install",
            "--command",
            "npm run dev",
            "--env",
            "PORT=3000",
        ])
        .unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.commands, vec!["npm install", "npm run dev"]);
                assert_eq!(args.env, vec!["PORT=3000"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["devflow", "list", "--store", "/tmp/s.json", "--quiet"])
            .unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert!(cli.quiet);
    }

    #[test]
    fn restore_strategy_is_value_enum() {
        let cli =
            Cli::try_parse_from(["devflow", "restore", "b.json", "--strategy", "rename"]).unwrap();
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.strategy, Some(RestoreStrategy::Rename))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn edit_without_flags_has_no_updates() {
        assert!(!EditArgs::default().has_updates());
        let args = EditArgs {
            branch: Some(String::new()),
            ..Default::default()
        };
        assert!(args.has_updates());
    }
}
