//! Session startup configuration.

/// User created when a session starts.
pub const DEFAULT_USER_NAME: &str = "Default User";
/// Note seeded into the default user of a fresh session.
pub const DEFAULT_SEED_NOTE: &str = "Initial note";
/// Characters shown per row in note lists.
pub const DEFAULT_PREVIEW_CHARS: usize = 60;

/// Initial data and presentation settings for a `NoteSession`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name of the user created and selected at startup.
    pub default_user: String,
    /// Text of a note created for the startup user; `None` starts empty.
    pub seed_note: Option<String>,
    /// Maximum preview length of a list row.
    pub preview_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_user: DEFAULT_USER_NAME.to_string(),
            seed_note: Some(DEFAULT_SEED_NOTE.to_string()),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl SessionConfig {
    /// Same defaults without the seed note.
    pub fn without_seed(mut self) -> Self {
        self.seed_note = None;
        self
    }

    /// Replaces the startup user name; blank names keep the default.
    pub fn with_user(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.default_user = trimmed.to_string();
        }
        self
    }
}
