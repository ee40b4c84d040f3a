//! Core domain logic for Notebox.
//! This crate is the single source of truth for note/user invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod richtext;
pub mod service;
pub mod session;

pub use config::SessionConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::user::{User, UserError};
pub use repo::{
    JsonNoteStore, NoteStore, SqliteNoteStore, StoreError, StoreFormat, StoreResult,
};
pub use richtext::{
    apply_inline_style, merge_style_declarations, toggle_tag, MarkupAction, MarkupEdit,
    PartialTagPolicy, RichTextError, Selection, StyleDeclaration, TagPair,
};
pub use service::note_manager::NoteManager;
pub use session::{LoadMode, NoteRow, NoteSession, SessionError, SessionResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
