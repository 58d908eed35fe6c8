//! Global settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Global settings singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pull after syncing branches even when a session does not ask for it.
    pub auto_git_pull: bool,
    /// Open editors in a new window instead of reusing one.
    pub open_editor_in_new_window: bool,
    /// Ask before deleting a session.
    pub confirm_before_delete: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_git_pull: false,
            open_editor_in_new_window: true,
            confirm_before_delete: true,
        }
    }
}

/// Name of a single setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    AutoGitPull,
    OpenEditorInNewWindow,
    ConfirmBeforeDelete,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::AutoGitPull,
        SettingKey::OpenEditorInNewWindow,
        SettingKey::ConfirmBeforeDelete,
    ];

    /// Stored key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::AutoGitPull => "autoGitPull",
            SettingKey::OpenEditorInNewWindow => "openEditorInNewWindow",
            SettingKey::ConfirmBeforeDelete => "confirmBeforeDelete",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SettingKey::AutoGitPull => "Auto git pull on session start",
            SettingKey::OpenEditorInNewWindow => "Open editor in new window",
            SettingKey::ConfirmBeforeDelete => "Confirm before deleting sessions",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = String;

    /// Accepts the stored camelCase name or its kebab-case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '-' && *c != '_').collect();
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<_> = SettingKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown setting '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::AutoGitPull => self.auto_git_pull,
            SettingKey::OpenEditorInNewWindow => self.open_editor_in_new_window,
            SettingKey::ConfirmBeforeDelete => self.confirm_before_delete,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::AutoGitPull => self.auto_git_pull = value,
            SettingKey::OpenEditorInNewWindow => self.open_editor_in_new_window = value,
            SettingKey::ConfirmBeforeDelete => self.confirm_before_delete = value,
        }
    }
}

/// Parse a boolean setting value (`true/false`, `yes/no`, `on/off`, `1/0`).
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{}'", other)),
    }
}
