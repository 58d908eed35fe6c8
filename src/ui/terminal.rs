//! Interactive terminal UI.
//!
//! Status lines go to stdout and are dropped in quiet mode. Warnings and
//! errors always go to stderr. Prompts are drawn with dialoguer.

use std::fmt::Display;
use std::io::{IsTerminal, Write};

use console::Term;

use crate::error::Result;

use super::{
    prompt_user, DevflowTheme, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    PromptResult, SpinnerHandle, UserInterface,
};

/// UI for a user sitting at a terminal.
pub struct TerminalUI {
    stdout: Term,
    stderr: Term,
    theme: DevflowTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            theme: DevflowTheme::detect(),
            mode,
        }
    }

    fn status(&mut self, line: impl Display) {
        if self.mode.shows_status() {
            let _ = writeln!(self.stdout, "{}", line);
        }
    }

    fn diagnostic(&mut self, line: impl Display) {
        let _ = writeln!(self.stderr, "{}", line);
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status(msg);
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.status(line);
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.format_warning(msg);
        self.diagnostic(line);
    }

    fn error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.diagnostic(line);
    }

    fn output(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.stderr)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = if self.mode.shows_spinners() {
            ProgressSpinner::new(message)
        } else {
            ProgressSpinner::hidden()
        };
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        let banner = format!("\n{}\n", self.theme.format_header(title));
        self.status(banner);
    }

    fn show_hint(&mut self, hint: &str) {
        let line = format!("  {}", self.theme.hint.apply_to(hint));
        self.status(line);
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Whether both ends of the conversation are a terminal.
fn attached_to_terminal() -> bool {
    Term::stdout().is_term() && std::io::stdin().is_terminal()
}

/// Pick the terminal UI when `interactive` is requested and a user is
/// actually attached, otherwise the non-interactive UI.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && attached_to_terminal() {
        Box::new(TerminalUI::new(mode))
    } else {
        tracing::debug!("Prompts will be answered from DEVFLOW_PROMPT_* or defaults");
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_terminal_keeps_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(ui.is_interactive());
    }

    #[test]
    fn non_interactive_request_never_prompts() {
        let ui = create_ui(false, OutputMode::Verbose);
        assert!(!ui.is_interactive());
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
