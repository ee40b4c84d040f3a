//! SQLite note file store.
//!
//! # Responsibility
//! - Persist a note collection into a migrated SQLite file.
//! - Read it back in saved order through a read-only connection.
//!
//! # Invariants
//! - A save replaces all rows inside one transaction.
//! - `position` preserves the user-visible note order.
//! - Loading never creates or migrates the file.

use crate::db::{open_db, open_db_read_only};
use crate::model::note::Note;
use crate::repo::{NoteStore, StoreError, StoreResult};
use rusqlite::{params, TransactionBehavior};
use std::path::Path;
use uuid::Uuid;

/// Stores notes in a single-table SQLite file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteNoteStore;

impl NoteStore for SqliteNoteStore {
    fn save_notes(&self, path: &Path, notes: &[Note]) -> StoreResult<()> {
        let mut conn = open_db(path)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM notes;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO notes (position, uuid, text, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, note) in notes.iter().enumerate() {
                let position = i64::try_from(position).map_err(|_| {
                    StoreError::Incompatible("note position exceeds i64".to_string())
                })?;
                insert.execute(params![
                    position,
                    note.id().to_string(),
                    note.text(),
                    note.created_at(),
                    note.modified_at(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_notes(&self, path: &Path) -> StoreResult<Vec<Note>> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let conn = open_db_read_only(path)?;
        let mut stmt = conn.prepare(
            "SELECT uuid, text, created_at, modified_at
             FROM notes
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let id = Uuid::parse_str(&uuid_text).map_err(|_| {
                StoreError::Incompatible(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
            })?;
            notes.push(Note::from_parts(
                id,
                row.get::<_, String>("text")?,
                row.get("created_at")?,
                row.get("modified_at")?,
            )?);
        }
        Ok(notes)
    }
}
