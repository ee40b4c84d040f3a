//! Schema versions for SQLite note files.
//!
//! # Responsibility
//! - Hold the ordered note-file migrations.
//! - Classify a file's `user_version` against this build.
//! - Bring older files up to date inside one transaction.
//!
//! # Invariants
//! - Versions in `MIGRATIONS` are strictly increasing, starting at 1.
//! - `PRAGMA user_version` is only written after every pending step ran.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// `(version, sql)` pairs, oldest first.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_notes.sql"))];

/// Where a note file's schema stands relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    /// Written by an older build (or never initialized, at 0).
    Behind(u32),
    /// Written by a newer build.
    Ahead(u32),
}

/// Schema version written by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let version = current_user_version(conn)?;
    let latest = latest_version();
    Ok(match version.cmp(&latest) {
        std::cmp::Ordering::Equal => SchemaState::Current,
        std::cmp::Ordering::Less => SchemaState::Behind(version),
        std::cmp::Ordering::Greater => SchemaState::Ahead(version),
    })
}

/// Fails unless the file is exactly at the latest schema.
pub fn ensure_current(conn: &Connection) -> DbResult<()> {
    match schema_state(conn)? {
        SchemaState::Current => Ok(()),
        SchemaState::Behind(db_version) | SchemaState::Ahead(db_version) => {
            Err(DbError::SchemaMismatch {
                db_version,
                expected: latest_version(),
            })
        }
    }
}

/// Upgrades an older note file; files from newer builds are refused.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = match schema_state(conn)? {
        SchemaState::Current => return Ok(()),
        SchemaState::Ahead(db_version) => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest_version(),
            })
        }
        SchemaState::Behind(version) => version,
    };

    let tx = conn.transaction()?;
    for (_, sql) in MIGRATIONS.iter().skip_while(|(version, _)| *version <= from) {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", latest_version())?;
    tx.commit()?;
    Ok(())
}
