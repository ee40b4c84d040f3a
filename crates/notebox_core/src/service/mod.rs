//! Core use-case services.
//!
//! # Responsibility
//! - Route note operations to the owning user by name.
//! - Keep UI layers decoupled from the user registry layout.

pub mod note_manager;
