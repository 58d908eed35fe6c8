//! Stop command implementation.
//!
//! Started processes are not tracked, so `devflow stop` only explains how
//! to stop them by hand.

use crate::cli::args::StopArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The stop command implementation.
pub struct StopCommand {
    args: StopArgs,
}

impl StopCommand {
    pub fn new(args: StopArgs) -> Self {
        Self { args }
    }
}

impl Command for StopCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Stop DevFlow Session");
        if let Some(name) = &self.args.name {
            tracing::debug!("stop requested for {}", name);
        }

        ui.warning("devflow does not track the processes it starts.");
        if cfg!(windows) {
            ui.message("Close the terminal windows running your session commands.");
        } else {
            ui.message("Press Ctrl+C in the terminals running your session commands,");
            ui.message("or stop background servers with `kill <pid>`.");
        }
        Ok(CommandResult::success())
    }
}
