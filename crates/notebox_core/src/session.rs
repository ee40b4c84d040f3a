//! UI-facing session controller.
//!
//! # Responsibility
//! - Hold the transient view state a note window needs: current user,
//!   selected note, editor buffer and editor selection.
//! - Expose every toolbar action (new/edit/delete/save/load, bold, italic,
//!   font family, font size, image) as one method.
//! - Write editor changes through to the selected note.
//!
//! # Invariants
//! - Domain data lives only in the owned `NoteManager`.
//! - The selection is tracked by `NoteId`, so list re-ordering and
//!   deletions never make it point at the wrong note.
//! - Blank input for new/edit is rejected before it reaches the model.
//! - The editor selection is always valid for the editor text.

use crate::config::SessionConfig;
use crate::model::note::{Note, NoteId};
use crate::model::user::{User, UserError};
use crate::repo::StoreError;
use crate::richtext::{
    apply_inline_style, insert_image, toggle_tag, MarkupEdit, PartialTagPolicy, RichTextError,
    Selection, StyleDeclaration, TagPair, FONT_SIZES,
};
use crate::service::note_manager::NoteManager;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Errors surfaced to the UI layer. All of them are recoverable.
#[derive(Debug)]
pub enum SessionError {
    UnknownUser(String),
    NoNoteSelected,
    /// Interactive input was empty or whitespace only.
    EmptyInput,
    /// Row number outside the current list.
    InvalidRow { row: usize, rows: usize },
    InvalidFontSize(u16),
    User(UserError),
    Store(StoreError),
    RichText(RichTextError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUser(name) => write!(f, "unknown user `{name}`"),
            Self::NoNoteSelected => write!(f, "no note selected"),
            Self::EmptyInput => write!(f, "note text must not be empty"),
            Self::InvalidRow { row, rows } => {
                write!(f, "row {row} does not exist ({rows} rows listed)")
            }
            Self::InvalidFontSize(points) => write!(
                f,
                "unsupported font size {points}pt; choose one of {FONT_SIZES:?}"
            ),
            Self::User(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::RichText(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::User(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::RichText(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserError> for SessionError {
    fn from(value: UserError) -> Self {
        Self::User(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RichTextError> for SessionError {
    fn from(value: RichTextError) -> Self {
        Self::RichText(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// How a load combines file contents with the current notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Merge,
}

/// One line of the note list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    /// Position in the user's note collection.
    pub index: usize,
    pub id: NoteId,
    pub preview: String,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Controller behind a note window.
#[derive(Debug)]
pub struct NoteSession {
    manager: NoteManager,
    config: SessionConfig,
    current_user: String,
    selected: Option<NoteId>,
    editor: String,
    selection: Selection,
    partial_tag_policy: PartialTagPolicy,
}

impl NoteSession {
    /// Starts a session with the configured user and optional seed note.
    pub fn new(config: SessionConfig) -> Self {
        let mut manager = NoteManager::new();
        let user = manager.create_user(config.default_user.clone());
        if let Some(seed) = config.seed_note.as_deref() {
            user.create_note(seed);
        }
        Self {
            current_user: config.default_user.clone(),
            manager,
            config,
            selected: None,
            editor: String::new(),
            selection: Selection::default(),
            partial_tag_policy: PartialTagPolicy::default(),
        }
    }

    /// Starts a session over an existing registry.
    pub fn with_manager(
        manager: NoteManager,
        current_user: &str,
        config: SessionConfig,
    ) -> SessionResult<Self> {
        if !manager.contains_user(current_user) {
            return Err(SessionError::UnknownUser(current_user.to_string()));
        }
        Ok(Self {
            manager,
            config,
            current_user: current_user.to_string(),
            selected: None,
            editor: String::new(),
            selection: Selection::default(),
            partial_tag_policy: PartialTagPolicy::default(),
        })
    }

    pub fn manager(&self) -> &NoteManager {
        &self.manager
    }

    pub fn current_user_name(&self) -> &str {
        &self.current_user
    }

    pub fn current_user(&self) -> SessionResult<&User> {
        self.manager
            .user(&self.current_user)
            .ok_or_else(|| SessionError::UnknownUser(self.current_user.clone()))
    }

    pub fn user_names(&self) -> Vec<String> {
        self.manager.user_names()
    }

    /// Registers `name` if it is new, then switches to it.
    ///
    /// An existing user is switched to, never replaced.
    pub fn add_user(&mut self, name: &str) -> SessionResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if !self.manager.contains_user(name) {
            self.manager.create_user(name);
        }
        self.switch_user(name)
    }

    /// Makes `name` the current user; unknown names leave state unchanged.
    pub fn switch_user(&mut self, name: &str) -> SessionResult<()> {
        if !self.manager.contains_user(name) {
            return Err(SessionError::UnknownUser(name.to_string()));
        }
        self.current_user = name.to_string();
        self.clear_selection();
        info!("event=user_switch module=session status=ok");
        Ok(())
    }

    /// Note list rows, newest first.
    pub fn rows(&self) -> SessionResult<Vec<NoteRow>> {
        let user = self.current_user()?;
        let mut rows: Vec<NoteRow> = user
            .notes()
            .iter()
            .enumerate()
            .map(|(index, note)| NoteRow {
                index,
                id: note.id(),
                preview: note.preview(self.config.preview_chars),
                created_at: note.created_at(),
                modified_at: note.modified_at(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.index.cmp(&a.index))
        });
        Ok(rows)
    }

    /// Selects the note at collection `index` and loads it into the editor.
    pub fn select_note(&mut self, index: usize) -> SessionResult<()> {
        let user = self.current_user()?;
        let note = user.note(index).ok_or(UserError::IndexOutOfRange {
            index,
            len: user.len(),
        })?;
        let (id, text) = (note.id(), note.text().to_string());
        self.selected = Some(id);
        self.selection = Selection::caret(text.len());
        self.editor = text;
        Ok(())
    }

    /// Selects by list row (as returned by `rows`).
    pub fn select_row(&mut self, row: usize) -> SessionResult<()> {
        let rows = self.rows()?;
        let index = rows
            .get(row)
            .map(|entry| entry.index)
            .ok_or(SessionError::InvalidRow {
                row,
                rows: rows.len(),
            })?;
        self.select_note(index)
    }

    /// Collection index of the selected note, if it still exists.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.manager.user(&self.current_user)?.position_of(id)
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let index = self.selected_index()?;
        self.manager.user(&self.current_user)?.note(index)
    }

    pub fn editor_text(&self) -> &str {
        &self.editor
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Sets the editor selection; fails without change when invalid.
    pub fn set_selection(&mut self, anchor: usize, head: usize) -> SessionResult<()> {
        let selection = Selection::new(anchor, head);
        selection.validate(&self.editor)?;
        self.selection = selection;
        Ok(())
    }

    pub fn partial_tag_policy(&self) -> PartialTagPolicy {
        self.partial_tag_policy
    }

    pub fn set_partial_tag_policy(&mut self, policy: PartialTagPolicy) {
        self.partial_tag_policy = policy;
    }

    /// Replaces the editor text (typing) and writes it to the selected note.
    ///
    /// The selection is kept when still valid, otherwise it becomes a caret
    /// at the end of the text.
    pub fn update_editor(&mut self, text: impl Into<String>) -> SessionResult<()> {
        self.editor = text.into();
        if self.selection.validate(&self.editor).is_err() {
            self.selection = Selection::caret(self.editor.len());
        }
        self.commit_editor()
    }

    /// Creates a note from interactive input and selects it.
    pub fn new_note(&mut self, input: &str) -> SessionResult<NoteId> {
        if input.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let id = self
            .manager
            .create_note(&self.current_user, input)
            .map(Note::id)
            .ok_or_else(|| SessionError::UnknownUser(self.current_user.clone()))?;
        let index = self.current_user()?.len() - 1;
        self.select_note(index)?;
        Ok(id)
    }

    /// Replaces the selected note's text with interactive input.
    pub fn edit_selected(&mut self, input: &str) -> SessionResult<()> {
        if input.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let index = self.selected_index().ok_or(SessionError::NoNoteSelected)?;
        self.manager.edit_note(&self.current_user, index, input)?;
        self.select_note(index)
    }

    /// Deletes the selected note and clears the editor.
    pub fn delete_selected(&mut self) -> SessionResult<Note> {
        let index = self.selected_index().ok_or(SessionError::NoNoteSelected)?;
        let user = self
            .manager
            .user_mut(&self.current_user)
            .ok_or_else(|| SessionError::UnknownUser(self.current_user.clone()))?;
        let removed = user.delete_note(index)?;
        self.clear_selection();
        Ok(removed)
    }

    /// Saves the current user's notes; returns how many were written.
    pub fn save(&self, path: impl AsRef<Path>) -> SessionResult<usize> {
        let user = self.current_user()?;
        user.save_notes_to_file(path)?;
        Ok(user.len())
    }

    /// Loads notes into the current user; returns how many were read.
    ///
    /// A selected note that survives the load is reloaded into the editor;
    /// otherwise the selection is cleared.
    pub fn load(&mut self, path: impl AsRef<Path>, mode: LoadMode) -> SessionResult<usize> {
        let user = self
            .manager
            .user_mut(&self.current_user)
            .ok_or_else(|| SessionError::UnknownUser(self.current_user.clone()))?;
        let count = match mode {
            LoadMode::Replace => user.replace_from_file(path)?,
            LoadMode::Merge => user.merge_from_file(path)?,
        };
        match self.selected_index() {
            Some(index) => self.select_note(index)?,
            None => self.clear_selection(),
        }
        Ok(count)
    }

    pub fn toggle_bold(&mut self) -> SessionResult<()> {
        self.toggle_pair(&TagPair::bold())
    }

    pub fn toggle_italic(&mut self) -> SessionResult<()> {
        self.toggle_pair(&TagPair::italic())
    }

    pub fn apply_font_family(&mut self, family: &str) -> SessionResult<()> {
        if family.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let edit = apply_inline_style(
            &self.editor,
            self.selection,
            &StyleDeclaration::font_family(family),
        )?;
        self.apply_edit(edit)
    }

    /// Applies a font size from `FONT_SIZES`.
    pub fn apply_font_size(&mut self, points: u16) -> SessionResult<()> {
        if !FONT_SIZES.contains(&points) {
            return Err(SessionError::InvalidFontSize(points));
        }
        let edit = apply_inline_style(
            &self.editor,
            self.selection,
            &StyleDeclaration::font_size(points),
        )?;
        self.apply_edit(edit)
    }

    /// Embeds the image at `path` at the selection end.
    pub fn insert_image(&mut self, path: impl AsRef<Path>) -> SessionResult<()> {
        let edit = insert_image(&self.editor, self.selection.end, path.as_ref())?;
        self.apply_edit(edit)
    }

    fn toggle_pair(&mut self, pair: &TagPair) -> SessionResult<()> {
        let edit = toggle_tag(&self.editor, self.selection, pair, self.partial_tag_policy)?;
        self.apply_edit(edit)
    }

    fn apply_edit(&mut self, edit: MarkupEdit) -> SessionResult<()> {
        self.editor = edit.text;
        self.selection = edit.selection;
        self.commit_editor()
    }

    fn commit_editor(&mut self) -> SessionResult<()> {
        let Some(index) = self.selected_index() else {
            return Ok(());
        };
        if self
            .selected_note()
            .is_some_and(|note| note.text() == self.editor)
        {
            return Ok(());
        }
        self.manager
            .edit_note(&self.current_user, index, self.editor.clone())?;
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.editor.clear();
        self.selection = Selection::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteSession, SessionError};
    use crate::config::SessionConfig;

    #[test]
    fn new_session_seeds_default_user() {
        let session = NoteSession::new(SessionConfig::default());
        assert_eq!(session.current_user_name(), "Default User");
        let rows = session.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].preview, "Initial note");
    }

    #[test]
    fn switching_to_unknown_user_keeps_current() {
        let mut session = NoteSession::new(SessionConfig::default());
        let err = session.switch_user("nobody").unwrap_err();
        assert!(matches!(err, SessionError::UnknownUser(_)));
        assert_eq!(session.current_user_name(), "Default User");
    }
}
