//! Start command implementation.
//!
//! The `devflow start` command runs the session start sequence for a named
//! session, or the last used one.

use crate::cli::args::StartArgs;
use crate::error::Result;
use crate::orchestrator::SessionStarter;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The start command implementation.
pub struct StartCommand<'a> {
    ctx: &'a CommandContext,
    args: StartArgs,
}

impl<'a> StartCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: StartArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for StartCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let starter = SessionStarter::new(
            &self.ctx.repository,
            self.ctx.git.as_ref(),
            self.ctx.launcher.as_ref(),
        );
        let session = starter.resolve(self.args.name.as_deref())?;

        ui.show_header(&format!("Starting session: {}", session.name));
        if self.args.name.is_none() {
            ui.message(&format!("Using last session: {}", session.name));
        }

        starter.run(&session, ui)?;
        Ok(CommandResult::success())
    }
}
