//! Info command implementation.
//!
//! The `devflow info` command shows a session's configuration together with
//! live checks: whether the path exists and, for repositories, the current
//! branch, uncommitted changes and remote.

use serde::Serialize;

use crate::cli::args::InfoArgs;
use crate::error::{DevflowError, Result};
use crate::git::RepoInfo;
use crate::session::{Session, SessionStats};
use crate::ui::{format_timestamp, DevflowTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::start_hint;

/// Session details plus live state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session: Session,
    pub path_exists: bool,
    pub is_git_repo: bool,
    pub repo: Option<RepoInfo>,
    pub stats: SessionStats,
    pub favorite: bool,
}

/// The info command implementation.
pub struct InfoCommand<'a> {
    ctx: &'a CommandContext,
    args: InfoArgs,
}

impl<'a> InfoCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: InfoArgs) -> Self {
        Self { ctx, args }
    }

    /// Gather details for the named session, or the last used one.
    pub fn gather(&self) -> Result<SessionInfo> {
        let repository = &self.ctx.repository;
        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => {
                let last = repository.get_last_used()?;
                if last.is_empty() {
                    return Err(DevflowError::NoSessionSelected);
                }
                last
            }
        };
        let session = repository
            .get(&name)?
            .ok_or_else(|| DevflowError::SessionNotFound { name: name.clone() })?;

        let path_exists = session.path.exists();
        let is_git_repo = path_exists && self.ctx.git.is_repo(&session.path);
        let repo = if is_git_repo {
            self.ctx
                .git
                .repo_info(&session.path)
                .map_err(|e| tracing::debug!("Could not read repo info: {}", e))
                .ok()
        } else {
            None
        };

        Ok(SessionInfo {
            stats: repository.session_stats(&name)?,
            favorite: repository.is_favorite(&name)?,
            session,
            path_exists,
            is_git_repo,
            repo,
        })
    }
}

impl Command for InfoCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let info = self.gather()?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&info).map_err(|e| DevflowError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let theme = DevflowTheme::detect();
        let session = &info.session;
        let label = |text: &str| theme.dim.apply_to(format!("{:<13}", text)).to_string();
        let check = if info.path_exists {
            theme.success.apply_to("✓")
        } else {
            theme.error.apply_to("✗")
        };

        ui.show_header(&session.name);
        ui.message(&format!("{}{} {}", label("Path:"), session.path.display(), check));
        ui.message(&format!("{}{}", label("Template:"), session.template));
        ui.message(&format!("{}{}", label("Editor:"), session.editor_display()));
        ui.message(&format!(
            "{}{}{}",
            label("Starts:"),
            info.stats.starts,
            if info.favorite { " ★" } else { "" }
        ));

        if !session.commands.is_empty() {
            ui.message("");
            ui.message(&theme.key.apply_to("Commands:").to_string());
            for (idx, cmd) in session.commands.iter().enumerate() {
                ui.message(&format!("  {}. {}", idx + 1, cmd));
            }
        }

        if !session.env.is_empty() {
            ui.message("");
            ui.message(&theme.key.apply_to("Environment:").to_string());
            for (key, value) in &session.env {
                ui.message(&format!("  {}={}", key, value));
            }
        }

        if let Some(repo) = &info.repo {
            ui.message("");
            ui.message(&theme.key.apply_to("Git:").to_string());
            ui.message(&format!(
                "  Current branch: {}",
                repo.branch.as_deref().unwrap_or("(detached)")
            ));
            if let Some(target) = session.branch() {
                ui.message(&format!("  Target branch:  {}", target));
            }
            if repo.ahead > 0 || repo.behind > 0 {
                ui.message(&format!("  Ahead {}, behind {}", repo.ahead, repo.behind));
            }
            let changes = repo.modified + repo.created + repo.deleted;
            if changes > 0 {
                ui.warning(&format!("  Uncommitted changes: {}", changes));
            }
            if let Some(remote) = repo.remotes.first() {
                ui.message(&format!("  Remote: {} ({})", remote.name, remote.url));
            }
        } else if session.git.is_some() {
            ui.message("");
            ui.message(&theme.key.apply_to("Git:").to_string());
            ui.warning("  Not a git repository");
        }

        ui.message("");
        ui.message(&theme.key.apply_to("Metadata:").to_string());
        ui.message(&format!("  Created:  {}", format_timestamp(session.created_at)));
        ui.message(&format!("  Updated:  {}", format_timestamp(session.updated_at)));
        ui.message("");

        start_hint(ui, &session.name);
        Ok(CommandResult::success())
    }
}
