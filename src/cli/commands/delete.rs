//! Delete command implementation.

use crate::cli::args::DeleteArgs;
use crate::error::{DevflowError, Result, EXIT_FAILURE};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::input::{ask_confirm, choose_session};

/// The delete command implementation.
///
/// Asks for confirmation unless `--yes` is given or the
/// `confirmBeforeDelete` setting is off.
pub struct DeleteCommand<'a> {
    ctx: &'a CommandContext,
    args: DeleteArgs,
}

impl<'a> DeleteCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: DeleteArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for DeleteCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Delete DevFlow Session");
        let repository = &self.ctx.repository;

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => match choose_session(repository, ui, "Which session do you want to delete?")? {
                Some(name) => name,
                None => return Ok(CommandResult::success()),
            },
        };

        if !repository.exists(&name)? {
            return Err(DevflowError::SessionNotFound { name });
        }

        let must_confirm = !self.args.yes && repository.get_settings()?.confirm_before_delete;
        if must_confirm {
            let question = format!("Are you sure you want to delete \"{}\"?", name);
            if !ask_confirm(ui, "confirm-delete", &question, false)? {
                ui.message("Deletion cancelled.");
                return Ok(CommandResult::success());
            }
        }

        let mut spinner = ui.start_spinner("Deleting session...");
        if repository.delete(&name)? {
            spinner.finish_success(&format!("Session \"{}\" deleted successfully!", name));
            Ok(CommandResult::success())
        } else {
            spinner.finish_error("Failed to delete session.");
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::dispatcher::testing::context;
    use crate::session::{SessionDraft, SettingKey};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn seeded(temp: &TempDir) -> CommandContext {
        let ctx = context(temp.path());
        ctx.repository.save("api", SessionDraft::default()).unwrap();
        ctx.repository.add_favorite("api").unwrap();
        ctx
    }

    fn named(name: &str) -> DeleteArgs {
        DeleteArgs {
            name: Some(name.into()),
            yes: false,
        }
    }

    #[test]
    fn confirmed_delete_removes_session_and_favorite() {
        let temp = TempDir::new().unwrap();
        let ctx = seeded(&temp);
        let mut ui = MockUI::new();
        ui.set_prompt_response("confirm-delete", "yes");

        let result = DeleteCommand::new(&ctx, named("api"))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(!ctx.repository.exists("api").unwrap());
        assert!(ctx.repository.get_favorites().unwrap().is_empty());
        assert_eq!(
            ui.spinner_results(),
            vec!["ok: Session \"api\" deleted successfully!"]
        );
    }

    #[test]
    fn declined_confirmation_keeps_session() {
        let temp = TempDir::new().unwrap();
        let ctx = seeded(&temp);
        let mut ui = MockUI::new();

        DeleteCommand::new(&ctx, named("api"))
            .execute(&mut ui)
            .unwrap();

        assert!(ctx.repository.exists("api").unwrap());
        assert!(ui.has_message("Deletion cancelled."));
    }

    #[test]
    fn yes_flag_skips_confirmation() {
        let temp = TempDir::new().unwrap();
        let ctx = seeded(&temp);
        let mut ui = MockUI::new();
        let args = DeleteArgs {
            yes: true,
            ..named("api")
        };

        DeleteCommand::new(&ctx, args).execute(&mut ui).unwrap();

        assert!(!ui.was_prompted("confirm-delete"));
        assert!(!ctx.repository.exists("api").unwrap());
    }

    #[test]
    fn setting_disables_confirmation() {
        let temp = TempDir::new().unwrap();
        let ctx = seeded(&temp);
        ctx.repository
            .update_setting(SettingKey::ConfirmBeforeDelete, false)
            .unwrap();
        let mut ui = MockUI::new();

        DeleteCommand::new(&ctx, named("api"))
            .execute(&mut ui)
            .unwrap();

        assert!(!ui.was_prompted("confirm-delete"));
        assert!(!ctx.repository.exists("api").unwrap());
    }

    #[test]
    fn unknown_session_is_not_found() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        let err = DeleteCommand::new(&ctx, named("nope"))
            .execute(&mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, DevflowError::SessionNotFound { .. }));
    }
}
