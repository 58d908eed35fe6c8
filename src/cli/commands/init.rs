//! Init command implementation.
//!
//! The `devflow init` command creates a session, optionally seeded from a
//! template. Every prompt can be skipped with a flag.

use crate::cli::args::InitArgs;
use crate::error::{DevflowError, Result};
use crate::session::{
    format_env_pairs, parse_command_list, parse_env_pairs, Editor, GitPolicy, SessionDraft,
};
use crate::templates::{self, Template};
use crate::ui::{PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{print_session, start_hint};
use super::input::{
    absolutize, ask_confirm, ask_editor, ask_select, ask_string, ask_validated,
    check_session_name, parse_editor, parse_env_flags,
};

/// Select value for "no template".
const NO_TEMPLATE: &str = "custom";

/// The init command implementation.
pub struct InitCommand<'a> {
    ctx: &'a CommandContext,
    args: InitArgs,
}

impl<'a> InitCommand<'a> {
    /// Create a new init command.
    pub fn new(ctx: &'a CommandContext, args: InitArgs) -> Self {
        Self { ctx, args }
    }

    /// Returns false when the user declines to overwrite `name`.
    fn confirm_overwrite(&self, name: &str, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.args.force || !self.ctx.repository.exists(name)? {
            return Ok(true);
        }
        ui.warning(&format!("Session \"{}\" already exists!", name));
        ask_confirm(ui, "overwrite", "Do you want to overwrite it?", false)
    }

    fn choose_template(&self, ui: &mut dyn UserInterface) -> Result<Option<&'static Template>> {
        if let Some(key) = &self.args.template {
            return templates::require(key).map(Some);
        }

        if !ask_confirm(ui, "use-template", "Would you like to use a template?", true)? {
            return Ok(None);
        }

        let options = templates::list()
            .iter()
            .map(|t| PromptOption::new(format!("{} - {}", t.name, t.description), t.key))
            .chain(std::iter::once(PromptOption::new(
                "Custom (no template)",
                NO_TEMPLATE,
            )))
            .collect();
        let key = ask_select(ui, "template", "Choose a template:", options, Some(NO_TEMPLATE))?;
        Ok(templates::get(&key))
    }

    fn default_name(&self) -> String {
        self.ctx
            .cwd()
            .file_name()
            .map(|n| n.to_string_lossy().replace(' ', "-"))
            .unwrap_or_else(|| "session".to_string())
    }
}

impl Command for InitCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Create New DevFlow Session");

        if let Some(name) = &self.args.name {
            check_session_name(name).map_err(|e| DevflowError::Validation { errors: vec![e] })?;
            if !self.confirm_overwrite(name, ui)? {
                ui.message("Init cancelled.");
                return Ok(CommandResult::success());
            }
        }

        let mut draft = SessionDraft::default();
        if let Some(template) = self.choose_template(ui)? {
            template.apply(&mut draft);
            ui.success(&format!("Using template: {}", template.name));
        }

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => {
                let name = ask_validated(
                    ui,
                    "name",
                    "Session name:",
                    Some(&self.default_name()),
                    check_session_name,
                )?;
                if !self.confirm_overwrite(&name, ui)? {
                    ui.message("Init cancelled.");
                    return Ok(CommandResult::success());
                }
                name
            }
        };

        let path = match &self.args.path {
            Some(path) => path.clone(),
            None => {
                let cwd = self.ctx.cwd().display().to_string();
                ask_string(ui, "path", "Project path:", Some(&cwd))?.into()
            }
        };

        draft.editor = match &self.args.editor {
            Some(editor) => parse_editor(editor)?,
            None => ask_editor(ui, draft.editor.or(Some(Editor::Code)))?,
        };

        if self.args.commands.is_empty() {
            let current = draft.commands.clone().unwrap_or_default().join(", ");
            let answer = ask_string(
                ui,
                "commands",
                "Commands to run (comma-separated):",
                Some(&current),
            )?;
            draft.commands = Some(parse_command_list(&answer));
        } else {
            draft.commands = Some(self.args.commands.clone());
        }

        let branch = match &self.args.branch {
            Some(branch) => branch.clone(),
            None => ask_string(ui, "branch", "Git branch (optional):", Some(""))?,
        };
        draft.git = (!branch.trim().is_empty()).then(|| GitPolicy {
            branch: branch.trim().to_string(),
            auto_pull: false,
        });

        if !self.args.env.is_empty() {
            draft.env = Some(parse_env_flags(&self.args.env)?);
        } else {
            let current = draft.env.clone().unwrap_or_default();
            if ask_confirm(ui, "add-env", "Add environment variables?", !current.is_empty())? {
                let answer = ask_string(
                    ui,
                    "env",
                    "Environment variables (KEY=value, comma-separated):",
                    Some(&format_env_pairs(&current)),
                )?;
                if !answer.is_empty() {
                    draft.env = Some(parse_env_pairs(&answer));
                }
            }
        }

        draft.name = Some(name.clone());
        draft.path = Some(absolutize(self.ctx.cwd(), path));
        self.ctx.repository.validate(&draft).into_result()?;

        let mut spinner = ui.start_spinner("Creating session...");
        let session = self.ctx.repository.save(&name, draft)?;
        spinner.finish_success(&format!("Session \"{}\" created successfully!", name));

        print_session(ui, &session);
        start_hint(ui, &name);
        Ok(CommandResult::success())
    }
}
