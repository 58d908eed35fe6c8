//! Favorite command implementation.

use crate::cli::args::FavoriteArgs;
use crate::error::{DevflowError, Result};
use crate::ui::{DevflowTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::FAVORITE_MARK;
use super::input::choose_session;

/// Toggles a session's favorite flag.
pub struct FavoriteCommand<'a> {
    ctx: &'a CommandContext,
    args: FavoriteArgs,
}

impl<'a> FavoriteCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: FavoriteArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for FavoriteCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let repository = &self.ctx.repository;

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => match choose_session(
                repository,
                ui,
                "Which session do you want to favorite/unfavorite?",
            )? {
                Some(name) => name,
                None => return Ok(CommandResult::success()),
            },
        };

        if !repository.exists(&name)? {
            return Err(DevflowError::SessionNotFound { name });
        }

        if repository.toggle_favorite(&name)? {
            let theme = DevflowTheme::detect();
            ui.success(&format!(
                "Added \"{}\" to favorites {}",
                name,
                theme.favorite.apply_to(FAVORITE_MARK)
            ));
        } else {
            ui.success(&format!("Removed \"{}\" from favorites", name));
        }
        Ok(CommandResult::success())
    }
}
