//! Stats command implementation.
//!
//! The `devflow stats` command shows start counts, the most used sessions
//! and favorites. Analytics entries for deleted sessions are left out.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::StatsArgs;
use crate::error::{DevflowError, Result};
use crate::ui::{format_relative_time, DevflowTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::FAVORITE_MARK;

const TOP_SESSIONS: usize = 10;

/// A ranked session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSession {
    pub rank: usize,
    pub name: String,
    pub starts: u64,
    pub last_started: Option<DateTime<Utc>>,
    pub favorite: bool,
}

/// Aggregate usage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub total_starts: u64,
    pub total_sessions: usize,
    pub top_sessions: Vec<RankedSession>,
    pub favorites: Vec<String>,
}

/// The stats command implementation.
pub struct StatsCommand<'a> {
    ctx: &'a CommandContext,
    args: StatsArgs,
}

impl<'a> StatsCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: StatsArgs) -> Self {
        Self { ctx, args }
    }

    pub fn report(&self) -> Result<UsageReport> {
        let repository = &self.ctx.repository;
        let sessions = repository.get_all()?;
        let analytics = repository.get_analytics()?;

        let top_sessions = analytics
            .ranked()
            .into_iter()
            .filter(|(name, _)| sessions.contains_key(name))
            .take(TOP_SESSIONS)
            .enumerate()
            .map(|(idx, (name, starts))| RankedSession {
                rank: idx + 1,
                last_started: analytics.stats(&name).last_started,
                favorite: analytics.is_favorite(&name),
                name,
                starts,
            })
            .collect();

        let favorites = analytics
            .favorites
            .iter()
            .filter(|name| sessions.contains_key(*name))
            .cloned()
            .collect();

        Ok(UsageReport {
            total_starts: analytics.total_starts,
            total_sessions: sessions.len(),
            top_sessions,
            favorites,
        })
    }
}

impl Command for StatsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.report()?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| DevflowError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let theme = DevflowTheme::detect();
        ui.show_header("DevFlow Statistics");

        ui.message(&format!(
            "Total session starts: {}",
            theme.highlight.apply_to(report.total_starts)
        ));
        ui.message(&format!("Total sessions: {}", report.total_sessions));
        ui.message(&format!("Favorite sessions: {}", report.favorites.len()));
        ui.message("");

        if report.top_sessions.is_empty() {
            ui.warning("No sessions have been started yet.");
            ui.show_hint("Run `devflow start <name>` to start a session");
            return Ok(CommandResult::success());
        }

        ui.message(&theme.key.apply_to("Most used sessions:").to_string());
        let mut table = Table::new(vec!["Rank", "Session", "Starts", "Last Used", ""]);
        for entry in &report.top_sessions {
            let last = entry
                .last_started
                .map(format_relative_time)
                .unwrap_or_else(|| "Never".to_string());
            let mark = if entry.favorite {
                theme.favorite.apply_to(FAVORITE_MARK).to_string()
            } else {
                String::new()
            };
            table.add_row(vec![
                format!("#{}", entry.rank),
                entry.name.clone(),
                entry.starts.to_string(),
                theme.dim.apply_to(last).to_string(),
                mark,
            ]);
        }
        ui.output(&table.render());

        if !report.favorites.is_empty() {
            ui.message("");
            ui.message(&theme.key.apply_to("Favorites:").to_string());
            for name in &report.favorites {
                ui.message(&format!("  {} {}", theme.favorite.apply_to(FAVORITE_MARK), name));
            }
        }

        Ok(CommandResult::success())
    }
}
