//! Settings command implementation.
//!
//! `devflow settings` shows the global settings. `--set key=value` and
//! `--reset` change them without prompting; otherwise the user is asked
//! whether to change, reset or leave them.

use std::str::FromStr;

use crate::cli::args::SettingsArgs;
use crate::error::{DevflowError, Result};
use crate::session::{parse_bool, SettingKey, Settings};
use crate::ui::{DevflowTheme, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::input::{ask_confirm, ask_select};

/// Parse every `key=value` assignment, reporting all bad ones together.
pub fn parse_assignments(values: &[String]) -> Result<Vec<(SettingKey, bool)>> {
    let mut parsed = Vec::new();
    let mut errors = Vec::new();

    for value in values {
        let Some((key, raw)) = value.split_once('=') else {
            errors.push(format!("expected KEY=VALUE, got '{}'", value));
            continue;
        };
        match (SettingKey::from_str(key), parse_bool(raw)) {
            (Ok(key), Ok(flag)) => parsed.push((key, flag)),
            (Err(e), _) | (_, Err(e)) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(DevflowError::Validation { errors })
    }
}

/// The settings command implementation.
pub struct SettingsCommand<'a> {
    ctx: &'a CommandContext,
    args: SettingsArgs,
}

impl<'a> SettingsCommand<'a> {
    pub fn new(ctx: &'a CommandContext, args: SettingsArgs) -> Self {
        Self { ctx, args }
    }

    fn show(&self, ui: &mut dyn UserInterface, settings: &Settings) {
        let theme = DevflowTheme::detect();
        ui.message(&theme.key.apply_to("Current Settings:").to_string());
        for key in SettingKey::ALL {
            let state = if settings.get(key) {
                theme.success.apply_to("Enabled")
            } else {
                theme.error.apply_to("Disabled")
            };
            ui.message(&format!(
                "  {:<34} {} {}",
                key.description(),
                state,
                theme.dim.apply_to(format!("({})", key))
            ));
        }
        ui.message("");
    }

    fn interactive(&self, ui: &mut dyn UserInterface, current: Settings) -> Result<()> {
        let options = vec![
            PromptOption::new("Change settings", "change"),
            PromptOption::new("Reset to defaults", "reset"),
            PromptOption::new("Cancel", "cancel"),
        ];
        let action = ask_select(
            ui,
            "action",
            "What would you like to do?",
            options,
            Some("cancel"),
        )?;

        match action.as_str() {
            "reset" => {
                if ask_confirm(ui, "confirm-reset", "Reset all settings to defaults?", false)? {
                    self.ctx.repository.reset_settings()?;
                    ui.success("Settings reset to defaults!");
                }
            }
            "change" => {
                for key in SettingKey::ALL {
                    let question = format!("{}?", key.description());
                    let value = ask_confirm(ui, key.as_str(), &question, current.get(key))?;
                    if value != current.get(key) {
                        self.ctx.repository.update_setting(key, value)?;
                    }
                }
                ui.success("Settings updated!");
            }
            _ => {}
        }
        Ok(())
    }
}

impl Command for SettingsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("DevFlow Settings");
        let repository = &self.ctx.repository;

        if self.args.reset {
            let settings = repository.reset_settings()?;
            ui.success("Settings reset to defaults!");
            self.show(ui, &settings);
            return Ok(CommandResult::success());
        }

        if !self.args.set.is_empty() {
            let mut settings = repository.get_settings()?;
            for (key, value) in parse_assignments(&self.args.set)? {
                settings = repository.update_setting(key, value)?;
                tracing::debug!("Set {} = {}", key, value);
            }
            ui.success("Settings updated!");
            self.show(ui, &settings);
            return Ok(CommandResult::success());
        }

        let current = repository.get_settings()?;
        self.show(ui, &current);
        self.interactive(ui, current)?;
        Ok(CommandResult::success())
    }
}
