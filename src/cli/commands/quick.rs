//! Quick command implementation.
//!
//! The `devflow quick` command offers the last used session, favorites and
//! the most started sessions in one menu, then starts the pick.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::orchestrator::SessionStarter;
use crate::session::{Analytics, Session};
use crate::ui::{PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{ACTIVE_MARK, FAVORITE_MARK};
use super::input::ask_select;

/// How many frequently used sessions the menu lists.
const MOST_USED_LIMIT: usize = 5;

/// Build the quick-start menu.
///
/// Order: last used, favorites, then the most started sessions not shown
/// yet. Names without a session are left out.
pub fn quick_choices(
    sessions: &BTreeMap<String, Session>,
    analytics: &Analytics,
    last_used: &str,
) -> Vec<PromptOption> {
    let mut shown = BTreeSet::new();
    let mut choices = Vec::new();

    if sessions.contains_key(last_used) {
        shown.insert(last_used.to_string());
        choices.push(PromptOption::new(
            format!("{} {} (last used)", ACTIVE_MARK, last_used),
            last_used,
        ));
    }

    for name in &analytics.favorites {
        if sessions.contains_key(name) && shown.insert(name.clone()) {
            let starts = analytics.stats(name).starts;
            choices.push(PromptOption::new(
                format!("{} {} ({} starts)", FAVORITE_MARK, name, starts),
                name.as_str(),
            ));
        }
    }

    let most_used: Vec<_> = analytics
        .ranked()
        .into_iter()
        .filter(|(name, _)| sessions.contains_key(name) && !shown.contains(name))
        .take(MOST_USED_LIMIT)
        .collect();
    for (name, starts) in most_used {
        choices.push(PromptOption::new(
            format!("  {} ({} starts)", name, starts),
            name.as_str(),
        ));
        shown.insert(name);
    }

    for name in sessions.keys() {
        if !shown.contains(name) {
            choices.push(PromptOption::new(format!("  {}", name), name.as_str()));
        }
    }

    choices
}

/// The quick command implementation.
pub struct QuickCommand<'a> {
    ctx: &'a CommandContext,
}

impl<'a> QuickCommand<'a> {
    pub fn new(ctx: &'a CommandContext) -> Self {
        Self { ctx }
    }
}

impl Command for QuickCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Quick Start");

        let repository = &self.ctx.repository;
        let sessions = repository.get_all()?;
        if sessions.is_empty() {
            ui.warning("No sessions found.");
            ui.show_hint("Create one with `devflow init`");
            return Ok(CommandResult::success());
        }

        let choices = quick_choices(
            &sessions,
            &repository.get_analytics()?,
            &repository.get_last_used()?,
        );
        let selected = ask_select(ui, "session", "Select a session:", choices, None)?;

        SessionStarter::new(repository, self.ctx.git.as_ref(), self.ctx.launcher.as_ref())
            .start(Some(&selected), ui)?;
        Ok(CommandResult::success())
    }
}
