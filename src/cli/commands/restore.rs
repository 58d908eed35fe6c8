//! Restore command implementation.
//!
//! Loads a backup, lists sessions that already exist, and applies the
//! chosen conflict strategy. Without conflicts everything is restored and
//! no strategy is asked for.

use std::str::FromStr;

use crate::cli::args::RestoreArgs;
use crate::error::{DevflowError, Result};
use crate::interchange::{find_conflicts, read_backup, restore, RestoreStrategy};
use crate::ui::{format_timestamp, DevflowTheme, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::input::{absolutize, ask_select, ask_validated, check_input_file};

/// The restore command implementation.
pub struct RestoreCommand<'a> {
    ctx: &'a CommandContext,
    args: RestoreArgs,
}

impl<'a> RestoreCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: RestoreArgs) -> Self {
        Self { ctx, args }
    }

    fn choose_strategy(&self, ui: &mut dyn UserInterface) -> Result<RestoreStrategy> {
        if let Some(strategy) = self.args.strategy {
            return Ok(strategy);
        }
        let options = RestoreStrategy::ALL
            .iter()
            .map(|s| PromptOption::new(s.label(), s.as_str()))
            .collect();
        let choice = ask_select(
            ui,
            "strategy",
            "How to handle conflicts?",
            options,
            Some(RestoreStrategy::Skip.as_str()),
        )?;
        RestoreStrategy::from_str(&choice).map_err(|e| DevflowError::Validation { errors: vec![e] })
    }
}

impl Command for RestoreCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Restore Sessions from Backup");

        let file = match &self.args.file {
            Some(file) => file.clone(),
            None => ask_validated(ui, "backup-file", "Path to backup file:", None, check_input_file)?
                .into(),
        };
        let file = absolutize(self.ctx.cwd(), file);

        let mut spinner = ui.start_spinner("Reading backup file...");
        let backup = match read_backup(&file) {
            Ok(backup) => backup,
            Err(e) => {
                spinner.finish_error("Could not read backup file");
                return Err(e);
            }
        };
        spinner.finish_success("Backup loaded successfully!");

        ui.message(&format!("Found {} session(s) in backup.", backup.sessions.len()));
        if let Some(at) = backup.exported_at {
            ui.message(&format!("Backup created: {}", format_timestamp(at)));
        }

        let conflicts = find_conflicts(&self.ctx.repository, &backup)?;
        let strategy = if conflicts.is_empty() {
            RestoreStrategy::Overwrite
        } else {
            let theme = DevflowTheme::detect();
            ui.warning(&format!("{} session(s) already exist:", conflicts.len()));
            for name in &conflicts {
                ui.message(&format!("  - {}", theme.warning.apply_to(name)));
            }
            self.choose_strategy(ui)?
        };

        let mut spinner = ui.start_spinner("Restoring sessions...");
        let summary = restore(&self.ctx.repository, &backup, strategy)?;
        if summary.cancelled {
            spinner.finish_error("Restore cancelled.");
            return Ok(CommandResult::success());
        }
        spinner.finish_success(&format!(
            "Restored {} session(s) successfully!",
            summary.restored.len()
        ));

        if !summary.skipped.is_empty() {
            ui.message(&format!(
                "Skipped {} existing session(s)",
                summary.skipped.len()
            ));
        }
        ui.show_hint("Run `devflow list` to see your sessions");
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::dispatcher::testing::context;
    use crate::interchange::{create_backup, write_backup};
    use crate::session::SessionDraft;
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Back up `api` and `web` from a scratch store into `temp`.
    fn backup_file(temp: &TempDir) -> PathBuf {
        let source = context(temp.path());
        for name in ["api", "web"] {
            source
                .repository
                .save(
                    name,
                    SessionDraft {
                        commands: Some(vec![format!("run {}", name)]),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        let file = temp.path().join("backup.json");
        write_backup(&create_backup(&source.repository.get_all().unwrap()), &file).unwrap();
        file
    }

    fn args(file: PathBuf, strategy: Option<RestoreStrategy>) -> RestoreArgs {
        RestoreArgs {
            file: Some(file),
            strategy,
        }
    }

    #[test]
    fn empty_store_restores_everything_without_asking() {
        let temp = TempDir::new().unwrap();
        let file = backup_file(&temp);
        let ctx = context(temp.path());
        let mut ui = MockUI::new();

        RestoreCommand::new(&ctx, args(file, None))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ctx.repository.get_all().unwrap().len(), 2);
        assert!(!ui.was_prompted("strategy"));
    }

    #[test]
    fn rename_keeps_original() {
        let temp = TempDir::new().unwrap();
        let file = backup_file(&temp);
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("strategy", "rename");

        RestoreCommand::new(&ctx, args(file, None))
            .execute(&mut ui)
            .unwrap();

        let sessions = ctx.repository.get_all().unwrap();
        assert!(sessions["api"].commands.is_empty());
        assert_eq!(sessions["api-restored"].commands, vec!["run api"]);
        assert!(sessions.contains_key("web"));
        assert!(ui.has_warning("1 session(s) already exist"));
    }

    #[test]
    fn skip_is_the_default_strategy() {
        let temp = TempDir::new().unwrap();
        let file = backup_file(&temp);
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();

        RestoreCommand::new(&ctx, args(file, None))
            .execute(&mut ui)
            .unwrap();

        assert!(ctx.repository.get("api").unwrap().unwrap().commands.is_empty());
        assert!(ui.has_message("Skipped 1 existing session(s)"));
    }

    #[test]
    fn cancel_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let file = backup_file(&temp);
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();

        RestoreCommand::new(&ctx, args(file, Some(RestoreStrategy::Cancel)))
            .execute(&mut ui)
            .unwrap();

        assert!(!ctx.repository.exists("web").unwrap());
        assert_eq!(ui.spinner_results().last().unwrap(), "err: Restore cancelled.");
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        let err = RestoreCommand::new(&ctx, args(temp.path().join("nope.json"), None))
            .execute(&mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, DevflowError::FileNotFound { .. }));
    }
}
