//! Doctor command implementation.
//!
//! The `devflow doctor` command checks every session for a missing path, a
//! git policy on a directory that is not a repository, and an editor whose
//! CLI is not on `PATH`.

use crate::error::{Result, EXIT_FAILURE};
use crate::git::GitClient;
use crate::session::{Editor, Session};
use crate::ui::{truncate_left, DevflowTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

const PATH_WIDTH: usize = 20;

/// Result of the git column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitCheck {
    /// No git policy, or the path is missing.
    NotChecked,
    Repo,
    NotRepo,
}

/// Health of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHealth {
    pub path_exists: bool,
    pub git: GitCheck,
    pub problems: Vec<String>,
}

impl SessionHealth {
    pub fn is_healthy(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check one session.
pub fn diagnose(
    session: &Session,
    git: &dyn GitClient,
    editor_available: &dyn Fn(Editor) -> bool,
) -> SessionHealth {
    let mut problems = Vec::new();

    let path_exists = session.path.exists();
    if !path_exists {
        problems.push("Path missing".to_string());
    }

    if let Some(editor) = session.editor {
        if !editor_available(editor) {
            problems.push(format!("Editor command not found: {}", editor.executable()));
        }
    }

    let git_check = if session.git.is_some() && path_exists {
        if git.is_repo(&session.path) {
            GitCheck::Repo
        } else {
            problems.push("Not a git repo".to_string());
            GitCheck::NotRepo
        }
    } else {
        GitCheck::NotChecked
    };

    SessionHealth {
        path_exists,
        git: git_check,
        problems,
    }
}

fn editor_on_path(editor: Editor) -> bool {
    which::which(editor.executable()).is_ok()
}

/// The doctor command implementation.
pub struct DoctorCommand<'a> {
    ctx: &'a CommandContext,
    editor_available: Box<dyn Fn(Editor) -> bool + 'a>,
}

impl<'a> DoctorCommand<'a> {
    pub fn new(ctx: &'a CommandContext) -> Self {
        Self {
            ctx,
            editor_available: Box::new(editor_on_path),
        }
    }

    /// Replace the `PATH` lookup used for the editor check.
    pub fn with_editor_probe(mut self, probe: impl Fn(Editor) -> bool + 'a) -> Self {
        self.editor_available = Box::new(probe);
        self
    }
}

impl Command for DoctorCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("DevFlow Health Check");

        let sessions = self.ctx.repository.get_all()?;
        if sessions.is_empty() {
            ui.warning("No sessions found.");
            return Ok(CommandResult::success());
        }

        ui.message(&format!("Checking {} session(s)...\n", sessions.len()));

        let theme = DevflowTheme::detect();
        let mut table = Table::new(vec!["Session", "Path", "Editor", "Git", "Status"]);
        let mut issues = Vec::new();

        for (name, session) in &sessions {
            let health = diagnose(session, self.ctx.git.as_ref(), &*self.editor_available);

            let path = if health.path_exists {
                theme
                    .success
                    .apply_to(truncate_left(&session.path.display().to_string(), PATH_WIDTH))
                    .to_string()
            } else {
                theme.error.apply_to("Missing").to_string()
            };
            let git = match health.git {
                GitCheck::NotChecked => "-".to_string(),
                GitCheck::Repo => theme.success.apply_to("✓").to_string(),
                GitCheck::NotRepo => theme.error.apply_to("✗").to_string(),
            };
            let status = if health.is_healthy() {
                theme.success.apply_to("✓ OK").to_string()
            } else {
                theme
                    .error
                    .apply_to(format!("✗ {} issue(s)", health.problems.len()))
                    .to_string()
            };

            table.add_row(vec![
                name.clone(),
                path,
                session.editor.map(|e| e.to_string()).unwrap_or_else(|| "-".into()),
                git,
                status,
            ]);

            if !health.is_healthy() {
                issues.push((name.clone(), health.problems));
            }
        }

        ui.output(&table.render());
        ui.message("");

        if issues.is_empty() {
            ui.success("All sessions are healthy!");
            return Ok(CommandResult::success());
        }

        ui.warning(&format!("Found issues in {} session(s):", issues.len()));
        for (name, problems) in &issues {
            ui.message(&format!("{}:", theme.warning.apply_to(name)));
            for problem in problems {
                ui.message(&format!("  - {}", problem));
            }
        }
        ui.message("");
        ui.message("Fix suggestions:");
        ui.show_hint("Update paths: devflow edit <session>");
        ui.show_hint("Remove broken sessions: devflow delete <session>");

        Ok(CommandResult::failure(EXIT_FAILURE))
    }
}
