//! Backup command implementation.

use crate::cli::args::BackupArgs;
use crate::error::Result;
use crate::interchange::{create_backup, default_backup_path, write_backup};
use crate::ui::{DevflowTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::input::{absolutize, ask_string};

/// Writes every session to a single backup file.
pub struct BackupCommand<'a> {
    ctx: &'a CommandContext,
    args: BackupArgs,
}

impl<'a> BackupCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: BackupArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for BackupCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Backup All Sessions");

        let sessions = self.ctx.repository.get_all()?;
        if sessions.is_empty() {
            ui.warning("No sessions to backup.");
            return Ok(CommandResult::success());
        }
        ui.message(&format!("Found {} session(s) to backup.", sessions.len()));

        let output = match &self.args.output {
            Some(output) => output.clone(),
            None => {
                let default = default_backup_path(self.ctx.cwd()).display().to_string();
                ask_string(ui, "backup-path", "Backup to:", Some(&default))?.into()
            }
        };
        let output = absolutize(self.ctx.cwd(), output);

        let backup = create_backup(&sessions);
        let mut spinner = ui.start_spinner("Creating backup...");
        if let Err(e) = write_backup(&backup, &output) {
            spinner.finish_error("Failed to create backup");
            return Err(e);
        }
        spinner.finish_success("Backup created successfully!");

        let theme = DevflowTheme::detect();
        ui.success(&format!(
            "Backed up {} session(s) to: {}",
            backup.session_count,
            theme.info.apply_to(output.display())
        ));
        ui.show_hint(&format!(
            "Keep this file safe! Restore it anytime with `devflow restore {}`",
            output.display()
        ));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::dispatcher::testing::context;
    use crate::interchange::{read_backup, BACKUP_VERSION};
    use crate::session::SessionDraft;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn writes_all_sessions() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        ctx.repository.save("web", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();
        let output = temp.path().join("backup.json");

        BackupCommand::new(
            &ctx,
            BackupArgs {
                output: Some(output.clone()),
            },
        )
        .execute(&mut ui)
        .unwrap();

        let backup = read_backup(&output).unwrap();
        assert_eq!(backup.version, BACKUP_VERSION);
        assert_eq!(backup.session_count, 2);
        assert!(backup.sessions.contains_key("web"));
        assert!(ui.has_hint("devflow restore"));
    }

    #[test]
    fn default_path_is_in_cwd() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();

        BackupCommand::new(&ctx, BackupArgs::default())
            .execute(&mut ui)
            .unwrap();

        let written: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("devflow-backup-"))
            .collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn empty_store_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        let mut ui = MockUI::new();
        let output = temp.path().join("backup.json");

        BackupCommand::new(
            &ctx,
            BackupArgs {
                output: Some(output.clone()),
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert!(ui.has_warning("No sessions to backup."));
        assert!(!output.exists());
    }
}
