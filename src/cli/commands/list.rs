//! List command implementation.
//!
//! The `devflow list` command shows every session, favorites first, each
//! group ordered by start count.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::{DevflowError, Result};
use crate::ui::{format_relative_time, DevflowTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{ACTIVE_MARK, FAVORITE_MARK};

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub name: String,
    pub path: String,
    pub template: String,
    pub commands: usize,
    pub starts: u64,
    pub last_started: Option<DateTime<Utc>>,
    pub favorite: bool,
    pub last_used: bool,
}

/// The list command implementation.
pub struct ListCommand<'a> {
    ctx: &'a CommandContext,
    args: ListArgs,
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(ctx: &'a CommandContext, args: ListArgs) -> Self {
        Self { ctx, args }
    }

    /// Rows in display order.
    pub fn entries(&self) -> Result<Vec<ListEntry>> {
        let repository = &self.ctx.repository;
        let sessions = repository.get_all()?;
        let analytics = repository.get_analytics()?;
        let last_used = repository.get_last_used()?;

        let mut entries: Vec<ListEntry> = sessions
            .values()
            .map(|session| {
                let stats = analytics.stats(&session.name);
                ListEntry {
                    name: session.name.clone(),
                    path: session.path.display().to_string(),
                    template: session.template.clone(),
                    commands: session.commands.len(),
                    starts: stats.starts,
                    last_started: stats.last_started,
                    favorite: analytics.is_favorite(&session.name),
                    last_used: session.name == last_used,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.favorite.cmp(&a.favorite).then(b.starts.cmp(&a.starts)));
        Ok(entries)
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.entries()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| DevflowError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Your DevFlow Sessions");

        if entries.is_empty() {
            ui.warning("No sessions found.");
            ui.show_hint("Create one with `devflow init`");
            return Ok(CommandResult::success());
        }

        let theme = DevflowTheme::detect();
        let mut table = Table::new(vec!["", "Name", "Template", "Commands", "Starts", "Last Used"]);
        for entry in &entries {
            let marker = if entry.favorite {
                theme.favorite.apply_to(FAVORITE_MARK).to_string()
            } else if entry.last_used {
                theme.success.apply_to(ACTIVE_MARK).to_string()
            } else {
                String::new()
            };
            let name = if entry.last_used {
                theme.success.apply_to(&entry.name).bold().to_string()
            } else {
                entry.name.clone()
            };
            let last = entry
                .last_started
                .map(format_relative_time)
                .unwrap_or_else(|| "Never".to_string());

            table.add_row(vec![
                marker,
                name,
                theme.dim.apply_to(&entry.template).to_string(),
                entry.commands.to_string(),
                entry.starts.to_string(),
                theme.dim.apply_to(last).to_string(),
            ]);
        }
        ui.output(&table.render());
        ui.message("");

        if let Some(active) = entries.iter().find(|e| e.last_used) {
            ui.message(&format!(
                "{} Currently active: {}",
                theme.success.apply_to(ACTIVE_MARK),
                active.name
            ));
        }
        let favorites = entries.iter().filter(|e| e.favorite).count();
        ui.message(&format!(
            "Total: {} session(s) | Favorites: {}",
            entries.len(),
            favorites
        ));
        ui.show_hint("Run `devflow start <name>` to start a session");
        ui.show_hint("Run `devflow stats` to see detailed analytics");

        Ok(CommandResult::success())
    }
}
