//! JSON note file store.
//!
//! # Responsibility
//! - Encode a note collection as one JSON document with a small header.
//! - Replace the destination atomically (temp file + rename).
//!
//! # Invariants
//! - `count` in the header always equals `notes.len()`.
//! - A document with an unknown `format` or `version` is rejected, never
//!   partially loaded.

use crate::model::note::Note;
use crate::repo::{NoteStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Format marker written into every JSON note file.
pub const JSON_FORMAT_MARKER: &str = "notebox.notes";
/// Current JSON note file version.
pub const JSON_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct NoteFileOut<'a> {
    format: &'static str,
    version: u32,
    count: usize,
    notes: &'a [Note],
}

#[derive(Deserialize)]
struct NoteFileIn {
    format: String,
    version: u32,
    count: usize,
    notes: Vec<Note>,
}

/// Stores notes as a versioned JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNoteStore;

impl NoteStore for JsonNoteStore {
    fn save_notes(&self, path: &Path, notes: &[Note]) -> StoreResult<()> {
        let document = NoteFileOut {
            format: JSON_FORMAT_MARKER,
            version: JSON_FORMAT_VERSION,
            count: notes.len(),
            notes,
        };
        let bytes = serde_json::to_vec_pretty(&document)?;

        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(parent).map_err(io_err)?;
        staged.write_all(&bytes).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }

    fn load_notes(&self, path: &Path) -> StoreResult<Vec<Note>> {
        let raw = std::fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let document: NoteFileIn = serde_json::from_slice(&raw)?;
        decode_document(document)
    }
}

fn decode_document(document: NoteFileIn) -> StoreResult<Vec<Note>> {
    if document.format != JSON_FORMAT_MARKER {
        return Err(StoreError::Incompatible(format!(
            "unexpected format marker `{}`",
            document.format
        )));
    }
    if document.version != JSON_FORMAT_VERSION {
        return Err(StoreError::Incompatible(format!(
            "unsupported version {} (expected {JSON_FORMAT_VERSION})",
            document.version
        )));
    }
    if document.count != document.notes.len() {
        return Err(StoreError::Incompatible(format!(
            "header count {} does not match {} stored notes",
            document.count,
            document.notes.len()
        )));
    }
    for note in &document.notes {
        note.validate()?;
    }
    Ok(document.notes)
}
