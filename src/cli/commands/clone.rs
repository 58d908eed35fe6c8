//! Clone command implementation.
//!
//! The `devflow clone` command clones a repository and creates a session
//! pointing at the new working tree.

use crate::cli::args::CloneArgs;
use crate::error::{DevflowError, Result};
use crate::git::{looks_like_repo_url, repo_name_from_url};
use crate::session::{parse_command_list, Editor, GitPolicy, SessionDraft};
use crate::templates;
use crate::ui::{PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{print_session, start_hint};
use super::input::{
    absolutize, ask_confirm, ask_editor, ask_select, ask_string, ask_validated,
    check_session_name,
};

const DEFAULT_COMMANDS: &str = "npm install, npm run dev";
const FALLBACK_BRANCH: &str = "main";

fn check_repo_url(url: &str) -> std::result::Result<(), String> {
    if url.trim().is_empty() {
        Err("Repository URL is required".to_string())
    } else if !looks_like_repo_url(url) {
        Err("Please provide a valid git repository URL".to_string())
    } else {
        Ok(())
    }
}

/// The clone command implementation.
pub struct CloneCommand<'a> {
    ctx: &'a CommandContext,
    args: CloneArgs,
}

impl<'a> CloneCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: CloneArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for CloneCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Clone Repository & Create Session");

        let url = match &self.args.url {
            Some(url) => {
                check_repo_url(url).map_err(|e| DevflowError::Validation { errors: vec![e] })?;
                url.clone()
            }
            None => ask_validated(ui, "url", "Repository URL:", None, check_repo_url)?,
        };
        let repo_name = repo_name_from_url(&url);

        let default_dest = self.ctx.cwd().join(&repo_name).display().to_string();
        let dest = absolutize(
            self.ctx.cwd(),
            ask_string(ui, "clone-path", "Where to clone?", Some(&default_dest))?,
        );

        let existing = self.ctx.repository.get_all()?;
        let name = ask_validated(ui, "name", "Session name:", Some(&repo_name), |name| {
            check_session_name(name)?;
            if existing.contains_key(name) {
                return Err(format!("Session \"{}\" already exists", name));
            }
            Ok(())
        })?;

        let use_template = ask_confirm(
            ui,
            "use-template",
            "Apply a template to this session?",
            true,
        )?;

        if dest.exists() {
            return Err(DevflowError::Validation {
                errors: vec![format!("Directory already exists: {}", dest.display())],
            });
        }

        let mut spinner = ui.start_spinner("Cloning repository...");
        if let Err(e) = self.ctx.git.clone_repo(&url, &dest) {
            spinner.finish_error("Failed to clone repository");
            return Err(e.into());
        }
        spinner.finish_success("Repository cloned successfully!");

        let mut draft = SessionDraft::default();
        if use_template {
            let options = templates::list()
                .iter()
                .map(|t| PromptOption::new(format!("{} - {}", t.name, t.description), t.key))
                .chain(std::iter::once(PromptOption::new(
                    "Custom (no template)",
                    "custom",
                )))
                .collect();
            let key = ask_select(ui, "template", "Choose a template:", options, Some("custom"))?;
            if let Some(template) = templates::get(&key) {
                template.apply(&mut draft);
            }
        }

        draft.editor = ask_editor(ui, draft.editor.or(Some(Editor::Code)))?;

        let default_commands = draft
            .commands
            .as_ref()
            .map(|c| c.join(", "))
            .unwrap_or_else(|| DEFAULT_COMMANDS.to_string());
        let commands = ask_string(
            ui,
            "commands",
            "Commands to run (comma-separated):",
            Some(&default_commands),
        )?;
        draft.commands = Some(parse_command_list(&commands));

        let branch = self
            .ctx
            .git
            .current_branch(&dest)
            .ok()
            .flatten()
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string());
        draft.git = Some(GitPolicy {
            branch,
            auto_pull: false,
        });
        draft.name = Some(name.clone());
        draft.path = Some(dest);

        let session = self.ctx.repository.save(&name, draft)?;
        ui.success(&format!("Session \"{}\" created!", name));
        print_session(ui, &session);
        start_hint(ui, &name);
        Ok(CommandResult::success())
    }
}
