use notebox_core::db::DbError;
use notebox_core::{Note, StoreError, User};
use std::path::Path;

fn user_with_edited_notes(name: &str) -> User {
    let mut user = User::new(name);
    user.create_note("<b>first</b>");
    user.create_note("second with <img src='data:image/png;base64,aGkh'/>");
    user.create_note("third");
    user.edit_note(1, "second, edited").unwrap();
    user
}

fn assert_round_trip(path: &Path) {
    let source = user_with_edited_notes("Alice");
    source.save_notes_to_file(path).unwrap();

    let mut fresh = User::new("Someone else");
    let loaded = fresh.replace_from_file(path).unwrap();

    assert_eq!(loaded, 3);
    assert_eq!(fresh.notes(), source.notes());
}

#[test]
fn json_save_then_load_round_trips_text_and_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    assert_round_trip(&dir.path().join("notes.json"));
}

#[test]
fn sqlite_save_then_load_round_trips_text_and_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    assert_round_trip(&dir.path().join("notes.sqlite3"));
}

#[test]
fn replace_discards_existing_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    user_with_edited_notes("Alice")
        .save_notes_to_file(&path)
        .unwrap();

    let mut target = User::new("Bob");
    target.create_note("will be replaced");
    target.replace_from_file(&path).unwrap();

    assert_eq!(target.len(), 3);
    assert_eq!(target.notes()[0].text(), "<b>first</b>");
}

#[test]
fn merge_appends_after_existing_notes_and_reassigns_colliding_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let mut user = user_with_edited_notes("Alice");
    user.save_notes_to_file(&path).unwrap();

    let appended = user.merge_from_file(&path).unwrap();

    assert_eq!(appended, 3);
    assert_eq!(user.len(), 6);
    let texts: Vec<&str> = user.notes().iter().map(Note::text).collect();
    assert_eq!(&texts[..3], &texts[3..]);
    for (original, copy) in user.notes()[..3].iter().zip(&user.notes()[3..]) {
        assert_ne!(original.id(), copy.id());
        assert_eq!(original.created_at(), copy.created_at());
        assert_eq!(original.modified_at(), copy.modified_at());
    }
}

#[test]
fn missing_file_reports_not_found_and_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut user = user_with_edited_notes("Alice");
    let before = user.notes().to_vec();

    for name in ["absent.json", "absent.db"] {
        let err = user.replace_from_file(dir.path().join(name)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)), "{name}: {err}");
        assert_eq!(user.notes(), before.as_slice());
    }
}

#[test]
fn corrupt_json_is_decode_error_and_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut user = user_with_edited_notes("Alice");
    let before = user.notes().to_vec();

    let err = user.merge_from_file(&path).unwrap_err();

    assert!(matches!(err, StoreError::Decode(_)));
    assert_eq!(user.notes(), before.as_slice());
}

#[test]
fn foreign_format_or_version_is_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    let mut user = User::new("Alice");

    let wrong_marker = dir.path().join("other.json");
    std::fs::write(
        &wrong_marker,
        r#"{"format":"someone.else","version":1,"count":0,"notes":[]}"#,
    )
    .unwrap();
    let err = user.replace_from_file(&wrong_marker).unwrap_err();
    assert!(matches!(err, StoreError::Incompatible(_)));

    let future = dir.path().join("future.json");
    std::fs::write(
        &future,
        r#"{"format":"notebox.notes","version":9,"count":0,"notes":[]}"#,
    )
    .unwrap();
    let err = user.replace_from_file(&future).unwrap_err();
    assert!(matches!(err, StoreError::Incompatible(_)));
}

#[test]
fn reversed_timestamps_in_file_are_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reversed.json");
    let body = serde_json::json!({
        "format": "notebox.notes",
        "version": 1,
        "count": 1,
        "notes": [{
            "id": "11111111-2222-4333-8444-555555555555",
            "text": "time travel",
            "created_at": 2000,
            "modified_at": 1000,
        }],
    });
    std::fs::write(&path, body.to_string()).unwrap();

    let err = User::new("Alice").replace_from_file(&path).unwrap_err();
    assert!(matches!(err, StoreError::Incompatible(_)));
}

#[test]
fn json_file_with_sqlite_extension_is_a_db_error() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("notes.json");
    let disguised = dir.path().join("notes.db");
    user_with_edited_notes("Alice")
        .save_notes_to_file(&json_path)
        .unwrap();
    std::fs::copy(&json_path, &disguised).unwrap();

    let err = User::new("Bob").replace_from_file(&disguised).unwrap_err();
    assert!(matches!(err, StoreError::Db(DbError::Sqlite(_))));
}

#[test]
fn unwritable_destination_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("notes.json");

    let err = user_with_edited_notes("Alice")
        .save_notes_to_file(&path)
        .unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
    assert!(!path.exists());
}

#[test]
fn saved_json_does_not_contain_user_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    user_with_edited_notes("Very Distinct Name")
        .save_notes_to_file(&path)
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("Very Distinct Name"));
}
