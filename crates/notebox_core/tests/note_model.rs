use notebox_core::{Note, NoteManager, User, UserError};

#[test]
fn alice_edits_first_note_and_timestamp_advances() {
    let mut manager = NoteManager::new();
    manager.create_user("Alice");
    manager.create_note("Alice", "Hello").unwrap();

    assert!(manager.edit_note("Alice", 0, "Hello world").unwrap());

    let notes = manager.notes("Alice").unwrap();
    assert_eq!(notes[0].text(), "Hello world");
    assert!(notes[0].modified_at() > notes[0].created_at());
}

#[test]
fn bob_deletes_first_of_two_notes() {
    let mut manager = NoteManager::new();
    manager.create_user("Bob");
    manager.create_note("Bob", "A");
    manager.create_note("Bob", "B");

    assert!(manager.delete_note("Bob", 0).unwrap());

    let texts: Vec<&str> = manager
        .notes("Bob")
        .unwrap()
        .iter()
        .map(Note::text)
        .collect();
    assert_eq!(texts, vec!["B"]);
}

#[test]
fn surviving_notes_keep_creation_minus_deletion_order() {
    let mut user = User::new("Carol");
    let mut expected: Vec<String> = Vec::new();
    for round in 0..12 {
        let text = format!("note {round}");
        user.create_note(text.as_str());
        expected.push(text);
        if round % 3 == 2 {
            let victim = round % expected.len();
            user.delete_note(victim).unwrap();
            expected.remove(victim);
        }
        if round % 4 == 1 {
            let last = expected.len() - 1;
            user.edit_note(last, format!("edited {round}")).unwrap();
            expected[last] = format!("edited {round}");
        }
    }

    assert_eq!(user.len(), expected.len());
    let texts: Vec<&str> = user.notes().iter().map(Note::text).collect();
    assert_eq!(texts, expected);
}

#[test]
fn out_of_range_index_fails_without_mutation() {
    let mut user = User::new("Dan");
    user.create_note("keep");
    let before = user.notes().to_vec();

    assert_eq!(
        user.delete_note(1).unwrap_err(),
        UserError::IndexOutOfRange { index: 1, len: 1 }
    );
    assert_eq!(
        user.edit_note(5, "nope").unwrap_err(),
        UserError::IndexOutOfRange { index: 5, len: 1 }
    );
    assert_eq!(user.notes(), before.as_slice());
}

#[test]
fn set_text_never_moves_modified_at_backwards() {
    let mut note = Note::new("start");
    let mut previous = note.modified_at();
    for step in 0..50 {
        note.set_text(format!("step {step}"));
        assert!(note.modified_at() > previous);
        assert!(note.modified_at() >= note.created_at());
        previous = note.modified_at();
    }
}

#[test]
fn empty_text_is_a_valid_note_at_model_level() {
    let mut user = User::new("Erin");
    let note = user.create_note("");
    assert_eq!(note.text(), "");
    assert_eq!(user.len(), 1);
}

#[test]
fn note_string_names_text_and_both_timestamps() {
    let note = Note::new("Groceries");
    let summary = note.note_string();
    assert!(summary.starts_with("Note: Groceries, created at: "));
    assert!(summary.contains(", last modified at: "));
}

#[test]
fn embedded_image_markup_is_stored_verbatim() {
    let mut user = User::new("Finn");
    let html = "<p>pic <img src='data:image/png;base64,aGkh'/></p>";
    user.create_note(html);
    assert_eq!(user.notes()[0].text(), html);
}
