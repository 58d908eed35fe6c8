//! Shared display helpers for session output.
//!
//! Used by `init`, `clone`, `edit` and `import` to echo the saved session,
//! and by `list`/`stats` for the favorite marker.

use crate::session::Session;
use crate::ui::{DevflowTheme, UserInterface};

/// Marker shown next to favorite sessions.
pub const FAVORITE_MARK: &str = "★";

/// Marker shown next to the last used session.
pub const ACTIVE_MARK: &str = "●";

/// Print a short summary of a session.
pub fn print_session(ui: &mut dyn UserInterface, session: &Session) {
    let theme = DevflowTheme::detect();
    ui.message("");
    ui.message(&format!(
        "{} {}",
        theme.key.apply_to("Session:"),
        theme.info.apply_to(&session.name)
    ));
    ui.message(&format!(
        "{} {}",
        theme.key.apply_to("Path:"),
        session.path.display()
    ));
    if let Some(editor) = session.editor {
        ui.message(&format!("{} {}", theme.key.apply_to("Editor:"), editor));
    }
    if let Some(branch) = session.branch() {
        ui.message(&format!("{} {}", theme.key.apply_to("Branch:"), branch));
    }
    if !session.commands.is_empty() {
        ui.message(&format!("{}", theme.key.apply_to("Commands:")));
        for (idx, cmd) in session.commands.iter().enumerate() {
            ui.message(&format!("  {}. {}", idx + 1, theme.dim.apply_to(cmd)));
        }
    }
    ui.message("");
}

/// Hint pointing at `devflow start <name>`.
pub fn start_hint(ui: &mut dyn UserInterface, name: &str) {
    ui.show_hint(&format!("Run `devflow start {}` to start this session", name));
}
