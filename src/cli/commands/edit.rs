//! Edit command implementation.
//!
//! With field flags (`--path`, `--editor`, `--command`, `--branch`,
//! `--env`) the changes are applied directly. Otherwise the user picks one
//! field to edit.

use crate::cli::args::EditArgs;
use crate::error::{DevflowError, Result};
use crate::session::{
    format_env_pairs, parse_command_list, parse_env_pairs, GitPolicy, SessionDraft,
};
use crate::ui::{PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::print_session;
use super::input::{
    absolutize, ask_editor, ask_select, ask_string, choose_session, parse_editor,
    parse_env_flags,
};

/// Replace the branch, keeping the pull flag. An empty branch clears the policy.
fn set_branch(draft: &mut SessionDraft, branch: &str) {
    let branch = branch.trim();
    draft.git = if branch.is_empty() {
        None
    } else {
        Some(GitPolicy {
            branch: branch.to_string(),
            auto_pull: draft.git.as_ref().is_some_and(|g| g.auto_pull),
        })
    };
}

/// The edit command implementation.
pub struct EditCommand<'a> {
    ctx: &'a CommandContext,
    args: EditArgs,
}

impl<'a> EditCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: EditArgs) -> Self {
        Self { ctx, args }
    }

    fn apply_flags(&self, draft: &mut SessionDraft) -> Result<()> {
        if let Some(path) = &self.args.path {
            draft.path = Some(absolutize(self.ctx.cwd(), path));
        }
        if let Some(editor) = &self.args.editor {
            draft.editor = parse_editor(editor)?;
        }
        if !self.args.commands.is_empty() {
            draft.commands = Some(self.args.commands.clone());
        }
        if let Some(branch) = &self.args.branch {
            set_branch(draft, branch);
        }
        if !self.args.env.is_empty() {
            draft.env = Some(parse_env_flags(&self.args.env)?);
        }
        Ok(())
    }

    /// Ask which field to change. Returns false on cancel.
    fn edit_field(&self, draft: &mut SessionDraft, ui: &mut dyn UserInterface) -> Result<bool> {
        let options = vec![
            PromptOption::new("Commands", "commands"),
            PromptOption::new("Path", "path"),
            PromptOption::new("Editor", "editor"),
            PromptOption::new("Git Branch", "git"),
            PromptOption::new("Environment Variables", "env"),
            PromptOption::new("Cancel", "cancel"),
        ];
        let field = ask_select(ui, "field", "What do you want to edit?", options, Some("cancel"))?;

        match field.as_str() {
            "commands" => {
                let current = draft.commands.clone().unwrap_or_default().join(", ");
                let answer =
                    ask_string(ui, "commands", "Commands (comma-separated):", Some(&current))?;
                draft.commands = Some(parse_command_list(&answer));
            }
            "path" => {
                let current = draft
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                let answer = ask_string(ui, "path", "Project path:", Some(&current))?;
                draft.path = Some(absolutize(self.ctx.cwd(), answer));
            }
            "editor" => {
                draft.editor = ask_editor(ui, draft.editor)?;
            }
            "git" => {
                let current = draft
                    .git
                    .as_ref()
                    .map(|g| g.branch.clone())
                    .unwrap_or_default();
                let answer = ask_string(ui, "branch", "Git branch:", Some(&current))?;
                set_branch(draft, &answer);
            }
            "env" => {
                let current = format_env_pairs(&draft.env.clone().unwrap_or_default());
                let answer = ask_string(
                    ui,
                    "env",
                    "Environment variables (KEY=value, comma-separated):",
                    Some(&current),
                )?;
                draft.env = Some(parse_env_pairs(&answer));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Command for EditCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Edit DevFlow Session");

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => match choose_session(
                &self.ctx.repository,
                ui,
                "Which session do you want to edit?",
            )? {
                Some(name) => name,
                None => return Ok(CommandResult::success()),
            },
        };

        let session = self
            .ctx
            .repository
            .get(&name)?
            .ok_or_else(|| DevflowError::SessionNotFound { name: name.clone() })?;

        let interactive = !self.args.has_updates();
        if interactive {
            print_session(ui, &session);
        }

        let stored_path = session.path.clone();
        let mut draft = SessionDraft::from(session);
        if !interactive {
            self.apply_flags(&mut draft)?;
        } else if !self.edit_field(&mut draft, ui)? {
            ui.message("Edit cancelled.");
            return Ok(CommandResult::success());
        }

        // Only a changed path is checked; other fields stay editable when the
        // stored path has gone missing.
        if draft.path.as_ref() != Some(&stored_path) {
            let path_only = SessionDraft {
                name: Some(name.clone()),
                path: draft.path.clone(),
                ..Default::default()
            };
            self.ctx.repository.validate(&path_only).into_result()?;
        }

        let mut spinner = ui.start_spinner("Updating session...");
        let updated = self.ctx.repository.save(&name, draft)?;
        spinner.finish_success("Session updated successfully!");

        print_session(ui, &updated);
        Ok(CommandResult::success())
    }
}
