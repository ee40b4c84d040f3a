//! Note domain model.
//!
//! # Responsibility
//! - Define the single text record owned by a user.
//! - Keep creation/modification timestamps consistent with text changes.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `modified_at >= created_at` at all times.
//! - Every `set_text` call moves `modified_at` strictly forward.

use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Validation errors for persisted or imported note state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// `id` must not be the nil UUID.
    NilId,
    /// `modified_at` is earlier than `created_at`.
    ModifiedBeforeCreated { created_at: i64, modified_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::ModifiedBeforeCreated {
                created_at,
                modified_at,
            } => write!(
                f,
                "note modified_at ({modified_at}) is earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// A single piece of user text with creation/modification timestamps.
///
/// Text is stored as-is. HTML markup and embedded `data:` image URIs are
/// plain text from this type's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    text: String,
    /// Unix epoch milliseconds.
    created_at: i64,
    /// Unix epoch milliseconds. Never earlier than `created_at`.
    modified_at: i64,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Rebuilds a note from persisted parts.
    ///
    /// Used by store implementations; rejects state that breaks the
    /// timestamp or identity invariants.
    pub fn from_parts(
        id: NoteId,
        text: impl Into<String>,
        created_at: i64,
        modified_at: i64,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id,
            text: text.into(),
            created_at,
            modified_at,
        };
        note.validate()?;
        Ok(note)
    }

    /// Checks identity and timestamp invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        if self.modified_at < self.created_at {
            return Err(NoteValidationError::ModifiedBeforeCreated {
                created_at: self.created_at,
                modified_at: self.modified_at,
            });
        }
        Ok(())
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and advances `modified_at`.
    ///
    /// The new timestamp is `max(now, previous + 1)`, so it is strictly
    /// greater than the previous one even when the wall clock stalls or
    /// steps backwards.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.modified_at = now_epoch_ms().max(self.modified_at.saturating_add(1));
    }

    /// Creation timestamp in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Last modification timestamp in epoch milliseconds.
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    /// Human-readable one-line summary with both timestamps.
    pub fn note_string(&self) -> String {
        format!(
            "Note: {}, created at: {}, last modified at: {}",
            self.text,
            format_epoch_ms(self.created_at),
            format_epoch_ms(self.modified_at)
        )
    }

    /// Plain-text summary for list rows.
    ///
    /// Tags are stripped, whitespace collapsed, and the result is cut to
    /// `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let without_tags = HTML_TAG_RE.replace_all(&self.text, " ");
        let collapsed = WHITESPACE_RE.replace_all(&without_tags, " ");
        let trimmed = collapsed.trim();
        let mut preview: String = trimmed.chars().take(max_chars).collect();
        if trimmed.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }

    pub(crate) fn reassign_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Renders epoch milliseconds as local date-time text.
pub fn format_epoch_ms(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(value) => value.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        None => epoch_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError};
    use uuid::Uuid;

    #[test]
    fn set_text_strictly_advances_modified_at() {
        let mut note = Note::new("first");
        let before = note.modified_at();
        note.set_text("second");
        assert!(note.modified_at() > before);
        assert!(note.modified_at() > note.created_at());
    }

    #[test]
    fn preview_strips_tags_and_truncates() {
        let note = Note::new("<b>Hello</b>\n  <i>wide</i> world");
        assert_eq!(note.preview(80), "Hello wide world");
        assert_eq!(note.preview(5), "Hello...");
    }

    #[test]
    fn from_parts_rejects_reversed_timestamps() {
        let err = Note::from_parts(Uuid::new_v4(), "x", 10, 5).unwrap_err();
        assert_eq!(
            err,
            NoteValidationError::ModifiedBeforeCreated {
                created_at: 10,
                modified_at: 5
            }
        );
    }
}
