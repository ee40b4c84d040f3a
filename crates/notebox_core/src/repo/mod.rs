//! Note file persistence.
//!
//! # Responsibility
//! - Define the `NoteStore` contract for saving/loading one note collection.
//! - Pick a store implementation from the destination path.
//! - Emit metadata-only save/load events.
//!
//! # Invariants
//! - Saves write a complete snapshot or leave the destination untouched.
//! - Loads fully parse and validate before returning any note.
//! - Store errors are semantic (`Incompatible`, `NotFound`) in addition to
//!   transport errors (`Io`, `Db`, `Decode`).

pub mod json_store;
pub mod sqlite_store;

use crate::db::DbError;
use crate::model::note::{Note, NoteValidationError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use json_store::JsonNoteStore;
pub use sqlite_store::SqliteNoteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for note file save/load operations.
#[derive(Debug)]
pub enum StoreError {
    /// File system failure at `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// SQLite note file failure.
    Db(DbError),
    /// The file is not well-formed JSON for the note file shape.
    Decode(serde_json::Error),
    /// The file parsed but belongs to another format/version or holds
    /// invalid note state.
    Incompatible(String),
    /// Nothing exists at the load path.
    NotFound(PathBuf),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "malformed note file: {err}"),
            Self::Incompatible(details) => write!(f, "incompatible note file: {details}"),
            Self::NotFound(path) => write!(f, "note file not found: `{}`", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Incompatible(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Incompatible(value.to_string())
    }
}

/// Persistence contract for one user's ordered note collection.
pub trait NoteStore {
    /// Writes `notes` to `path`, replacing any previous content.
    fn save_notes(&self, path: &Path, notes: &[Note]) -> StoreResult<()>;
    /// Reads a previously saved collection from `path`, preserving order.
    fn load_notes(&self, path: &Path) -> StoreResult<Vec<Note>>;
}

/// On-disk note file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Sqlite,
}

impl StoreFormat {
    /// Picks the format from the file extension.
    ///
    /// `.db`, `.sqlite` and `.sqlite3` select SQLite; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the store implementation for this format.
    pub fn store(self) -> Box<dyn NoteStore> {
        match self {
            Self::Json => Box::new(JsonNoteStore),
            Self::Sqlite => Box::new(SqliteNoteStore),
        }
    }
}

/// Saves `notes` to `path` using the format implied by the extension.
pub fn save_notes(path: &Path, notes: &[Note]) -> StoreResult<()> {
    let format = StoreFormat::from_path(path);
    let started_at = Instant::now();
    let result = format.store().save_notes(path, notes);
    match &result {
        Ok(()) => info!(
            "event=note_save module=store status=ok format={} count={} duration_ms={}",
            format.as_str(),
            notes.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=note_save module=store status=error format={} duration_ms={} error={}",
            format.as_str(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Loads notes from `path` using the format implied by the extension.
pub fn load_notes(path: &Path) -> StoreResult<Vec<Note>> {
    let format = StoreFormat::from_path(path);
    let started_at = Instant::now();
    let result = format.store().load_notes(path);
    match &result {
        Ok(notes) => info!(
            "event=note_load module=store status=ok format={} count={} duration_ms={}",
            format.as_str(),
            notes.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=note_load module=store status=error format={} duration_ms={} error={}",
            format.as_str(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
