//! Connection bootstrap utilities for SQLite note files.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Trigger schema migrations before returning a writable connection.
//! - Open existing note files read-only for loading.
//!
//! # Invariants
//! - Writable connections have migrations fully applied.
//! - Read-only connections are only returned for files at the latest schema.

use super::migrations::{apply_migrations, ensure_current};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) a SQLite note file and applies pending migrations.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");
    let opened = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));
    log_open_result("file", started_at, opened)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    let opened = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));
    log_open_result("memory", started_at, opened)
}

/// Opens an existing SQLite note file without modifying it.
///
/// # Errors
/// - Returns `DbError::Sqlite` when the file is missing or not a database.
/// - Returns `DbError::SchemaMismatch` when the file is not at the latest
///   schema version (including an empty, never-migrated file).
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=read_only");
    let opened = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(DbError::from)
    .and_then(|conn| ensure_current(&conn).map(|()| conn));
    log_open_result("read_only", started_at, opened)
}

fn log_open_result(
    mode: &str,
    started_at: Instant,
    opened: DbResult<Connection>,
) -> DbResult<Connection> {
    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    opened
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
