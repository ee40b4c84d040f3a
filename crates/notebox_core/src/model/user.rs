//! User domain model.
//!
//! # Responsibility
//! - Own one user's ordered note collection.
//! - Route file save/load of that collection through the note stores.
//!
//! # Invariants
//! - Note order is insertion order; deletion shifts later notes down.
//! - Out-of-range index operations never mutate the collection.
//! - A failed load leaves the in-memory collection untouched.

use crate::model::note::{now_epoch_ms, Note, NoteId};
use crate::repo::{load_notes, save_notes, StoreResult};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Errors raised by user-level note operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserError {
    /// `index` does not address an existing note.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for UserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "note index {index} out of range for {len} notes")
            }
        }
    }
}

impl Error for UserError {}

/// A named owner of an ordered note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    created_at: i64,
    notes: Vec<Note>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: now_epoch_ms(),
            notes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation timestamp in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Appends a new note and returns it.
    pub fn create_note(&mut self, text: impl Into<String>) -> &Note {
        self.notes.push(Note::new(text));
        info!(
            "event=note_create module=user status=ok index={} count={}",
            self.notes.len() - 1,
            self.notes.len()
        );
        &self.notes[self.notes.len() - 1]
    }

    /// Replaces the text of the note at `index`.
    pub fn edit_note(&mut self, index: usize, text: impl Into<String>) -> Result<(), UserError> {
        let len = self.notes.len();
        let note = self
            .notes
            .get_mut(index)
            .ok_or(UserError::IndexOutOfRange { index, len })?;
        note.set_text(text);
        info!("event=note_edit module=user status=ok index={index}");
        Ok(())
    }

    /// Removes and returns the note at `index`.
    pub fn delete_note(&mut self, index: usize) -> Result<Note, UserError> {
        let len = self.notes.len();
        if index >= len {
            return Err(UserError::IndexOutOfRange { index, len });
        }
        let removed = self.notes.remove(index);
        info!(
            "event=note_delete module=user status=ok index={index} count={}",
            self.notes.len()
        );
        Ok(removed)
    }

    /// Read-only view of the notes in user-visible order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    /// Current index of the note with `id`, if it is still present.
    pub fn position_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Writes the whole note collection to `path`.
    ///
    /// The file format follows the path extension (see `StoreFormat`).
    /// The user name is not part of the saved data.
    pub fn save_notes_to_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        save_notes(path.as_ref(), &self.notes)
    }

    /// Loads notes from `path` and replaces the current collection.
    ///
    /// Returns the number of notes loaded.
    pub fn replace_from_file(&mut self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let loaded = load_notes(path.as_ref())?;
        let count = loaded.len();
        self.notes = loaded;
        Ok(count)
    }

    /// Loads notes from `path` and appends them after the current ones.
    ///
    /// Loaded notes whose id is already present get a fresh id. Text and
    /// timestamps are kept. Returns the number of notes appended.
    pub fn merge_from_file(&mut self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let loaded = load_notes(path.as_ref())?;
        let count = loaded.len();
        let mut known: HashSet<_> = self.notes.iter().map(Note::id).collect();
        for mut note in loaded {
            while !known.insert(note.id()) {
                note.reassign_id();
            }
            self.notes.push(note);
        }
        Ok(count)
    }
}
