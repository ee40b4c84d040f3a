//! User registry and note routing.
//!
//! # Responsibility
//! - Own every `User`, keyed by name.
//! - Route create/edit/delete/list calls to the named user.
//!
//! # Invariants
//! - User names are unique; creating an existing name replaces that user.
//! - Unknown user names are tolerated: routing calls become no-ops and
//!   report that nothing happened instead of failing.
//! - `users()` returns a snapshot detached from the registry.

use crate::model::note::Note;
use crate::model::user::{User, UserError};
use log::{info, warn};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Process-wide entry point for user and note creation.
#[derive(Debug, Clone, Default)]
pub struct NoteManager {
    users: BTreeMap<String, User>,
}

impl NoteManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user, replacing any existing user with the same name.
    pub fn create_user(&mut self, name: impl Into<String>) -> &mut User {
        let name = name.into();
        let user = User::new(name.clone());
        match self.users.entry(name) {
            Entry::Occupied(mut slot) => {
                info!("event=user_create module=manager status=ok replaced=true");
                slot.insert(user);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                info!("event=user_create module=manager status=ok replaced=false");
                slot.insert(user)
            }
        }
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn user_mut(&mut self, name: &str) -> Option<&mut User> {
        self.users.get_mut(name)
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// Registered user names in sorted order.
    pub fn user_names(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    /// Creates a note for `user_name`; `None` when the user is unknown.
    pub fn create_note(&mut self, user_name: &str, text: impl Into<String>) -> Option<&Note> {
        match self.users.get_mut(user_name) {
            Some(user) => Some(user.create_note(text)),
            None => {
                warn_unknown_user("create_note");
                None
            }
        }
    }

    /// Edits one note of `user_name`.
    ///
    /// Returns `Ok(false)` when the user is unknown (nothing happens),
    /// `Ok(true)` when the edit was applied.
    pub fn edit_note(
        &mut self,
        user_name: &str,
        index: usize,
        text: impl Into<String>,
    ) -> Result<bool, UserError> {
        match self.users.get_mut(user_name) {
            Some(user) => user.edit_note(index, text).map(|()| true),
            None => {
                warn_unknown_user("edit_note");
                Ok(false)
            }
        }
    }

    /// Deletes one note of `user_name`, with the same unknown-user policy
    /// as `edit_note`.
    pub fn delete_note(&mut self, user_name: &str, index: usize) -> Result<bool, UserError> {
        match self.users.get_mut(user_name) {
            Some(user) => user.delete_note(index).map(|_| true),
            None => {
                warn_unknown_user("delete_note");
                Ok(false)
            }
        }
    }

    /// Notes of `user_name`, or `None` when the user is unknown.
    pub fn notes(&self, user_name: &str) -> Option<&[Note]> {
        self.users.get(user_name).map(User::notes)
    }

    /// Snapshot copy of all users.
    pub fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }
}

fn warn_unknown_user(operation: &str) {
    warn!("event={operation} module=manager status=skipped reason=unknown_user");
}
