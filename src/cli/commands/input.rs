//! Prompt and flag helpers shared by the session commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{DevflowError, Result};
use crate::session::{parse_env_pair, Editor, SessionRepository};
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::display::FAVORITE_MARK;

pub fn ask_string(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    Ok(ui
        .prompt(&Prompt::input(key, question, default))?
        .as_string()
        .trim()
        .to_string())
}

pub fn ask_confirm(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: bool,
) -> Result<bool> {
    Ok(ui.prompt(&Prompt::confirm(key, question, default))?.as_bool())
}

pub fn ask_select(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    options: Vec<PromptOption>,
    default: Option<&str>,
) -> Result<String> {
    Ok(ui
        .prompt(&Prompt::select(key, question, options, default))?
        .as_string())
}

/// Ask for a value until `check` accepts it.
///
/// Interactive UIs re-ask after showing the problem. Anywhere else the
/// first rejection is a validation error.
pub fn ask_validated<F>(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: Option<&str>,
    check: F,
) -> Result<String>
where
    F: Fn(&str) -> std::result::Result<(), String>,
{
    loop {
        let answer = ask_string(ui, key, question, default)?;
        match check(&answer) {
            Ok(()) => return Ok(answer),
            Err(problem) if ui.is_interactive() => ui.warning(&problem),
            Err(problem) => {
                return Err(DevflowError::Validation {
                    errors: vec![problem],
                })
            }
        }
    }
}

/// Session names must be non-empty and contain no whitespace.
pub fn check_session_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        Err("Session name is required".to_string())
    } else if name.chars().any(char::is_whitespace) {
        Err("Session name cannot contain spaces".to_string())
    } else {
        Ok(())
    }
}

/// Input files must be named and exist.
pub fn check_input_file(input: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        Err("File path is required".to_string())
    } else if !Path::new(input).exists() {
        Err("File does not exist".to_string())
    } else {
        Ok(())
    }
}

/// Editor menu with a trailing `none` entry.
pub fn editor_options() -> Vec<PromptOption> {
    Editor::ALL
        .iter()
        .map(|e| PromptOption::new(format!("{} ({})", e.label(), e), e.as_str()))
        .chain(std::iter::once(PromptOption::new("None", "none")))
        .collect()
}

pub fn ask_editor(ui: &mut dyn UserInterface, default: Option<Editor>) -> Result<Option<Editor>> {
    let default = default.map(|e| e.as_str()).unwrap_or("none");
    let choice = ask_select(
        ui,
        "editor",
        "Which editor do you use?",
        editor_options(),
        Some(default),
    )?;
    parse_editor(&choice)
}

/// Parse an `--editor` value; `none` clears the editor.
pub fn parse_editor(value: &str) -> Result<Option<Editor>> {
    Editor::parse_choice(value).map_err(|e| DevflowError::Validation { errors: vec![e] })
}

/// Parse repeated `--env KEY=value` flags. Every malformed pair is reported.
pub fn parse_env_flags(values: &[String]) -> Result<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();
    let mut errors = Vec::new();
    for value in values {
        match parse_env_pair(value) {
            Ok((k, v)) => {
                env.insert(k, v);
            }
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(env)
    } else {
        Err(DevflowError::Validation { errors })
    }
}

/// Resolve a user-supplied path against `cwd`.
pub fn absolutize(cwd: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Ask which session to act on, marking favorites.
///
/// Returns `None` after warning when there are no sessions.
pub fn choose_session(
    repository: &SessionRepository,
    ui: &mut dyn UserInterface,
    question: &str,
) -> Result<Option<String>> {
    let sessions = repository.get_all()?;
    if sessions.is_empty() {
        ui.warning("No sessions found.");
        ui.show_hint("Create one with `devflow init`");
        return Ok(None);
    }

    let favorites = repository.get_favorites()?;
    let options = sessions
        .keys()
        .map(|name| {
            let label = if favorites.contains(name) {
                format!("{} {}", name, FAVORITE_MARK)
            } else {
                name.clone()
            };
            PromptOption::new(label, name.as_str())
        })
        .collect();

    ask_select(ui, "session", question, options, None).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionDraft;
    use crate::store::MemoryStore;
    use crate::ui::MockUI;

    #[test]
    fn session_name_rules() {
        assert!(check_session_name("api").is_ok());
        assert_eq!(
            check_session_name("").unwrap_err(),
            "Session name is required"
        );
        assert_eq!(
            check_session_name("my api").unwrap_err(),
            "Session name cannot contain spaces"
        );
    }

    #[test]
    fn validated_prompt_fails_when_not_interactive() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("name", "my api");
        let err = ask_validated(&mut ui, "name", "Name:", None, check_session_name).unwrap_err();
        assert!(matches!(err, DevflowError::Validation { .. }));
    }

    #[test]
    fn validated_prompt_reasks_when_interactive() {
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_prompt_responses("name", vec!["my api", "api"]);

        let name = ask_validated(&mut ui, "name", "Name:", None, check_session_name).unwrap();

        assert_eq!(name, "api");
        assert!(ui.has_warning("cannot contain spaces"));
    }

    #[test]
    fn editor_menu_ends_with_none() {
        let options = editor_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].value, "code");
        assert_eq!(options[5].value, "none");
    }

    #[test]
    fn ask_editor_maps_none() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("editor", "none");
        assert_eq!(ask_editor(&mut ui, Some(Editor::Code)).unwrap(), None);
    }

    #[test]
    fn env_flags_collect_all_errors() {
        let ok = parse_env_flags(&["A=1".into(), "B=2".into()]).unwrap();
        assert_eq!(ok.len(), 2);

        let err = parse_env_flags(&["junk".into(), "=x".into()]).unwrap_err();
        match err {
            DevflowError::Validation { errors } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        let cwd = Path::new("/work");
        assert_eq!(absolutize(cwd, "/abs/api"), PathBuf::from("/abs/api"));
        assert_eq!(absolutize(cwd, "api"), PathBuf::from("/work/api"));
    }

    #[test]
    fn choose_session_warns_when_empty() {
        let repo = SessionRepository::new(Box::new(MemoryStore::new()));
        let mut ui = MockUI::new();
        assert_eq!(choose_session(&repo, &mut ui, "Which?").unwrap(), None);
        assert!(ui.has_warning("No sessions found."));
    }

    #[test]
    fn choose_session_returns_selection() {
        let repo = SessionRepository::new(Box::new(MemoryStore::new()));
        repo.save("api", SessionDraft::default()).unwrap();
        repo.save("web", SessionDraft::default()).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("session", "web");

        assert_eq!(
            choose_session(&repo, &mut ui, "Which?").unwrap().as_deref(),
            Some("web")
        );
    }
}
