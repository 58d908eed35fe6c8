//! Session records and drafts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Template label for sessions not seeded from a template.
pub const CUSTOM_TEMPLATE: &str = "custom";

/// Supported editors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Editor {
    Code,
    Cursor,
    Webstorm,
    Sublime,
    Atom,
}

impl Editor {
    /// All editors in menu order.
    pub const ALL: [Editor; 5] = [
        Editor::Code,
        Editor::Cursor,
        Editor::Webstorm,
        Editor::Sublime,
        Editor::Atom,
    ];

    /// Stored identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Editor::Code => "code",
            Editor::Cursor => "cursor",
            Editor::Webstorm => "webstorm",
            Editor::Sublime => "sublime",
            Editor::Atom => "atom",
        }
    }

    /// Human-readable label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            Editor::Code => "VS Code",
            Editor::Cursor => "Cursor",
            Editor::Webstorm => "WebStorm",
            Editor::Sublime => "Sublime Text",
            Editor::Atom => "Atom",
        }
    }

    /// Executable looked up on `PATH`.
    pub fn executable(&self) -> &'static str {
        match self {
            Editor::Code => "code",
            Editor::Cursor => "cursor",
            Editor::Webstorm => "webstorm",
            Editor::Sublime => "subl",
            Editor::Atom => "atom",
        }
    }

    /// Window flag for the editor, if it has one.
    pub fn window_flag(&self, new_window: bool) -> Option<&'static str> {
        match (self, new_window) {
            (Editor::Code | Editor::Cursor, true) => Some("--new-window"),
            (Editor::Code | Editor::Cursor, false) => Some("--reuse-window"),
            (Editor::Sublime | Editor::Atom, true) => Some("-n"),
            (Editor::Sublime | Editor::Atom, false) => Some("-a"),
            (Editor::Webstorm, _) => None,
        }
    }

    /// Parse a menu or flag choice where `none` means no editor.
    pub fn parse_choice(value: &str) -> Result<Option<Editor>, String> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Editor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Editor::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown editor '{}'", s))
    }
}

/// Git branch policy for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPolicy {
    pub branch: String,
    #[serde(default)]
    pub auto_pull: bool,
}

/// A stored development session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, deserialize_with = "lenient_editor")]
    pub editor: Option<Editor>,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub git: Option<GitPolicy>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_template() -> String {
    CUSTOM_TEMPLATE.to_string()
}

/// Unknown editor names load as no editor so one bad entry cannot make the
/// whole store unreadable.
fn lenient_editor<'de, D>(deserializer: D) -> Result<Option<Editor>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.and_then(|name| match Editor::from_str(&name) {
        Ok(editor) => Some(editor),
        Err(_) => {
            tracing::warn!("Ignoring unknown editor \"{}\"", name);
            None
        }
    }))
}

impl Session {
    /// Editor name for display, or `none`.
    pub fn editor_display(&self) -> &'static str {
        self.editor.map(|e| e.as_str()).unwrap_or("none")
    }

    /// Branch named by the git policy, if any.
    pub fn branch(&self) -> Option<&str> {
        self.git
            .as_ref()
            .map(|g| g.branch.as_str())
            .filter(|b| !b.is_empty())
    }
}

/// Partial session used for create, edit and import.
///
/// Every field is optional. [`SessionRepository::save`] fills the
/// rest.
///
/// [`SessionRepository::save`]: super::SessionRepository::save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDraft {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient_editor")]
    pub editor: Option<Editor>,
    pub commands: Option<Vec<String>>,
    pub git: Option<GitPolicy>,
    pub env: Option<BTreeMap<String, String>>,
    pub template: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Session> for SessionDraft {
    fn from(session: Session) -> Self {
        Self {
            name: Some(session.name),
            path: Some(session.path),
            editor: session.editor,
            commands: Some(session.commands),
            git: session.git,
            env: Some(session.env),
            template: Some(session.template),
            created_at: Some(session.created_at),
        }
    }
}

/// Split a comma-separated command list, dropping blanks.
pub fn parse_command_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `KEY=value` pairs separated by commas.
///
/// Entries without `=` or with an empty key are ignored.
pub fn parse_env_pairs(input: &str) -> BTreeMap<String, String> {
    input
        .split(',')
        .filter_map(|pair| parse_env_pair(pair).ok())
        .collect()
}

/// Parse a single `KEY=value` pair.
pub fn parse_env_pair(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=value, got '{}'", pair.trim()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{}'", pair.trim()));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Render env vars as `KEY=value` pairs joined by commas.
pub fn format_env_pairs(env: &BTreeMap<String, String>) -> String {
    env.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}
