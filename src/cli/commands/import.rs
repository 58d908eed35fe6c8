//! Import command implementation.
//!
//! Reads a session export file, resolves a name conflict by overwriting or
//! renaming, optionally points the session at a new path, and saves it.

use std::path::PathBuf;

use crate::cli::args::ImportArgs;
use crate::error::Result;
use crate::interchange::read_session_file;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{print_session, start_hint};
use super::input::{
    absolutize, ask_confirm, ask_validated, check_input_file, check_session_name,
};

const IMPORT_SUFFIX: &str = "-imported";

fn check_existing_path(input: &str) -> std::result::Result<(), String> {
    if std::path::Path::new(input).exists() {
        Ok(())
    } else {
        Err(format!("Path does not exist: {}", input))
    }
}

/// The import command implementation.
pub struct ImportCommand<'a> {
    ctx: &'a CommandContext,
    args: ImportArgs,
}

impl<'a> ImportCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: ImportArgs) -> Self {
        Self { ctx, args }
    }

    /// Name to save under after conflict handling.
    fn target_name(&self, imported: String, ui: &mut dyn UserInterface) -> Result<String> {
        let name = self.args.name.clone().unwrap_or(imported);
        if self.args.overwrite || !self.ctx.repository.exists(&name)? {
            return Ok(name);
        }

        let question = format!("Session \"{}\" already exists. Overwrite?", name);
        if ask_confirm(ui, "overwrite", &question, false)? {
            return Ok(name);
        }

        let suggested = format!("{}{}", name, IMPORT_SUFFIX);
        ask_validated(
            ui,
            "new-name",
            "Enter a new name for this session:",
            Some(&suggested),
            check_session_name,
        )
    }

    fn target_path(&self, stored: PathBuf, ui: &mut dyn UserInterface) -> Result<PathBuf> {
        if let Some(path) = &self.args.path {
            return Ok(absolutize(self.ctx.cwd(), path));
        }

        let question = format!("Current path is \"{}\". Update it?", stored.display());
        if !ask_confirm(ui, "update-path", &question, !stored.exists())? {
            return Ok(stored);
        }

        let cwd = self.ctx.cwd().display().to_string();
        let answer = ask_validated(
            ui,
            "new-path",
            "New project path:",
            Some(&cwd),
            check_existing_path,
        )?;
        Ok(absolutize(self.ctx.cwd(), answer))
    }
}

impl Command for ImportCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Import DevFlow Session");

        let file = match &self.args.file {
            Some(file) => file.clone(),
            None => ask_validated(ui, "file", "Path to .devflow.json file:", None, check_input_file)?
                .into(),
        };
        let file = absolutize(self.ctx.cwd(), file);

        let mut spinner = ui.start_spinner("Reading session file...");
        let mut draft = match read_session_file(&file) {
            Ok(draft) => draft,
            Err(e) => {
                spinner.finish_error("Could not read session file");
                return Err(e);
            }
        };
        spinner.finish_success("File loaded successfully!");

        let name = self.target_name(draft.name.take().unwrap_or_default(), ui)?;
        let path = self.target_path(draft.path.take().unwrap_or_default(), ui)?;
        draft.name = Some(name.clone());
        draft.path = Some(path);

        let mut spinner = ui.start_spinner("Importing session...");
        let session = self.ctx.repository.save(&name, draft)?;
        spinner.finish_success(&format!("Session \"{}\" imported successfully!", name));

        print_session(ui, &session);
        start_hint(ui, &name);
        Ok(CommandResult::success())
    }
}
