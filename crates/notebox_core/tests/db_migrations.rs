use notebox_core::db::migrations::{latest_version, schema_state, SchemaState};
use notebox_core::db::{open_db, open_db_in_memory, open_db_read_only, DbError};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("SELECT name FROM pragma_table_info('{table}');"))
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn fresh_note_file_gets_notes_table_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(schema_state(&conn).unwrap(), SchemaState::Current);
    assert_eq!(
        column_names(&conn, "notes"),
        ["position", "uuid", "text", "created_at", "modified_at"]
    );
}

#[test]
fn reopening_a_note_file_keeps_saved_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    open_db(&path)
        .unwrap()
        .execute(
            "INSERT INTO notes (position, uuid, text, created_at, modified_at)
             VALUES (0, 'a', 'kept', 1, 2);",
            [],
        )
        .unwrap();

    let conn = open_db(&path).unwrap();
    let text: String = conn
        .query_row("SELECT text FROM notes WHERE uuid = 'a';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(text, "kept");
}

#[test]
fn unversioned_sqlite_file_is_upgraded_on_write_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE scratch (x INTEGER);")
        .unwrap();
    assert_eq!(
        schema_state(&Connection::open(&path).unwrap()).unwrap(),
        SchemaState::Behind(0)
    );

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_state(&conn).unwrap(), SchemaState::Current);
    assert!(!column_names(&conn, "scratch").is_empty());
}

#[test]
fn note_file_from_newer_build_is_refused_by_both_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    assert!(matches!(
        open_db(&path).unwrap_err(),
        DbError::UnsupportedSchemaVersion {
            db_version: 999,
            ..
        }
    ));
    match open_db_read_only(&path).unwrap_err() {
        DbError::SchemaMismatch {
            db_version,
            expected,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(expected, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(user_version(&Connection::open(&path).unwrap()), 999);
}

#[test]
fn read_only_open_never_initializes_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blank = dir.path().join("blank.db");
    Connection::open(&blank)
        .unwrap()
        .execute_batch("CREATE TABLE scratch (x INTEGER);")
        .unwrap();

    assert!(matches!(
        open_db_read_only(&blank).unwrap_err(),
        DbError::SchemaMismatch { db_version: 0, .. }
    ));
    assert_eq!(user_version(&Connection::open(&blank).unwrap()), 0);
}

#[test]
fn notes_table_rejects_modified_before_created() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO notes (position, uuid, text, created_at, modified_at)
         VALUES (0, 'x', 'y', 10, 5);",
        [],
    );
    assert!(result.is_err());
}
