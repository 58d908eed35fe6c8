//! Built-in session templates.
//!
//! Templates are static presets that seed a new session with an editor,
//! startup commands and environment variables. [`Template::apply`] is the
//! only merge point: it fills fields the draft leaves unset and never
//! touches anything else.

use std::collections::BTreeMap;

use crate::error::{DevflowError, Result};
use crate::session::{Editor, SessionDraft};

/// A session template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Lookup key (e.g. `react-app`).
    pub key: &'static str,
    /// Display name, stored as the session's template label.
    pub name: &'static str,
    pub description: &'static str,
    pub editor: Editor,
    pub commands: &'static [&'static str],
    pub env: &'static [(&'static str, &'static str)],
}

const NPM_COMMANDS: &[&str] = &["npm install", "npm run dev"];
const NODE_DEV_ENV: &[(&str, &str)] = &[("NODE_ENV", "development")];

const CATALOG: [Template; 5] = [
    Template {
        key: "react-app",
        name: "React Application",
        description: "Modern React app with Vite",
        editor: Editor::Code,
        commands: NPM_COMMANDS,
        env: NODE_DEV_ENV,
    },
    Template {
        key: "node-api",
        name: "Node.js API",
        description: "Express.js REST API",
        editor: Editor::Code,
        commands: NPM_COMMANDS,
        env: &[("NODE_ENV", "development"), ("PORT", "3000")],
    },
    Template {
        key: "nextjs",
        name: "Next.js App",
        description: "Next.js with TypeScript",
        editor: Editor::Code,
        commands: NPM_COMMANDS,
        env: NODE_DEV_ENV,
    },
    Template {
        key: "python-flask",
        name: "Python Flask API",
        description: "Flask REST API",
        editor: Editor::Code,
        commands: &["pip install -r requirements.txt", "python app.py"],
        env: &[("FLASK_ENV", "development"), ("FLASK_APP", "app.py")],
    },
    Template {
        key: "vue-app",
        name: "Vue.js Application",
        description: "Vue 3 with Vite",
        editor: Editor::Code,
        commands: NPM_COMMANDS,
        env: NODE_DEV_ENV,
    },
];

/// All templates in catalog order.
pub fn list() -> &'static [Template] {
    &CATALOG
}

/// Look up a template by key.
pub fn get(key: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.key == key)
}

/// Look up a template by key, failing with a not-found error.
pub fn require(key: &str) -> Result<&'static Template> {
    get(key).ok_or_else(|| DevflowError::UnknownTemplate {
        name: key.to_string(),
    })
}

impl Template {
    pub fn commands(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.to_string()).collect()
    }

    pub fn env(&self) -> BTreeMap<String, String> {
        self.env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Fill unset draft fields from this template and label the draft with
    /// the template's display name.
    pub fn apply(&self, draft: &mut SessionDraft) {
        if draft.editor.is_none() {
            draft.editor = Some(self.editor);
        }
        if draft.commands.as_ref().is_none_or(|c| c.is_empty()) {
            draft.commands = Some(self.commands());
        }
        if draft.env.as_ref().is_none_or(|e| e.is_empty()) {
            draft.env = Some(self.env());
        }
        draft.template = Some(self.name.to_string());
    }
}
