//! Domain model for users and their notes.
//!
//! # Responsibility
//! - Define the note record and the user that owns an ordered collection.
//! - Keep timestamp and index invariants inside the model types.
//!
//! # Invariants
//! - Notes are only mutated through `Note::set_text` or `User` methods.
//! - Each note is identified by a stable `NoteId`.

pub mod note;
pub mod user;
