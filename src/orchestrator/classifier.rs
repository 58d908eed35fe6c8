//! Long-running command classification.

/// How a session command is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Spawned detached and never awaited.
    LongRunning,
    /// Awaited before the next command starts.
    Blocking,
}

/// Decides which commands are long-running by substring markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClassifier {
    markers: Vec<String>,
}

impl Default for CommandClassifier {
    fn default() -> Self {
        Self::with_markers(["dev", "start", "serve"])
    }
}

impl CommandClassifier {
    /// Classifier matching any of `markers` anywhere in the command.
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn classify(&self, command: &str) -> CommandKind {
        if self.markers.iter().any(|m| command.contains(m.as_str())) {
            CommandKind::LongRunning
        } else {
            CommandKind::Blocking
        }
    }
}
