//! Session records and the repository that persists them.
//!
//! A session is a named bundle of project path, editor, startup commands,
//! environment variables and git branch policy. The [`SessionRepository`]
//! owns all reads and writes, together with the last-used marker,
//! analytics, favorites and settings that live in the same document.

mod analytics;
mod model;
mod repository;
mod settings;
mod validation;

pub use analytics::{Analytics, SessionStats};
pub use model::{
    format_env_pairs, parse_command_list, parse_env_pair, parse_env_pairs, Editor, GitPolicy,
    Session, SessionDraft, CUSTOM_TEMPLATE,
};
pub use repository::SessionRepository;
pub use settings::{parse_bool, SettingKey, Settings};
pub use validation::{validate, ValidationReport};
