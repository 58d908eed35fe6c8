//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{DevflowError, Result};

use super::theme::DevflowTheme;
use super::{
    parse_yes, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "DEVFLOW_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `DEVFLOW_PROMPT_<KEY>` environment variables,
/// then from the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: DevflowTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: DevflowTheme::plain(),
        }
    }

    /// Environment variable that answers the prompt with `key`.
    pub fn env_key(key: &str) -> String {
        format!(
            "{}{}",
            PROMPT_ENV_PREFIX,
            key.to_uppercase().replace(['-', '.', ' '], "_")
        )
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn output(&mut self, text: &str) {
        println!("{}", text);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .env_overrides
            .get(&Self::env_key(&prompt.key))
            .or(prompt.default.as_ref())
            .cloned()
            .ok_or_else(|| DevflowError::Prompt {
                key: prompt.key.clone(),
                message: format!(
                    "no default value in non-interactive mode (set {})",
                    Self::env_key(&prompt.key)
                ),
            })?;

        match &prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(parse_yes(&answer))),
            PromptType::Input => Ok(PromptResult::String(answer)),
            PromptType::Select { options } => {
                if options.iter().any(|o| o.value == answer) {
                    Ok(PromptResult::String(answer))
                } else {
                    Err(DevflowError::Prompt {
                        key: prompt.key.clone(),
                        message: format!("'{}' is not one of the available choices", answer),
                    })
                }
            }
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(NoopSpinner {
            mode: self.mode,
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only the final status line.
struct NoopSpinner {
    mode: OutputMode,
    theme: DevflowTheme,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }
}
