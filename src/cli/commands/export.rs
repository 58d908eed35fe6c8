//! Export command implementation.

use crate::cli::args::ExportArgs;
use crate::error::{DevflowError, Result};
use crate::interchange::{default_export_path, export_session};
use crate::ui::{DevflowTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::input::{absolutize, ask_string, choose_session};

/// Writes one session to a shareable JSON file.
pub struct ExportCommand<'a> {
    ctx: &'a CommandContext,
    args: ExportArgs,
}

impl<'a> ExportCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: ExportArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for ExportCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Export DevFlow Session");
        let repository = &self.ctx.repository;

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => match choose_session(repository, ui, "Which session do you want to export?")? {
                Some(name) => name,
                None => return Ok(CommandResult::success()),
            },
        };

        let session = repository
            .get(&name)?
            .ok_or_else(|| DevflowError::SessionNotFound { name: name.clone() })?;

        let output = match &self.args.output {
            Some(output) => output.clone(),
            None => {
                let default = default_export_path(self.ctx.cwd(), &name)
                    .display()
                    .to_string();
                ask_string(ui, "export-path", "Export to:", Some(&default))?.into()
            }
        };
        let output = absolutize(self.ctx.cwd(), output);

        let mut spinner = ui.start_spinner("Exporting session...");
        if let Err(e) = export_session(&session, &output) {
            spinner.finish_error("Failed to export session");
            return Err(e);
        }
        spinner.finish_success("Session exported successfully!");

        let theme = DevflowTheme::detect();
        ui.success(&format!(
            "Exported to: {}",
            theme.info.apply_to(output.display())
        ));
        ui.show_hint("Share this file with others or use it as a backup");
        Ok(CommandResult::success())
    }
}
