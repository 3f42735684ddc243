//! Note state container with linear undo/redo.
//!
//! The store keeps the current list of notes plus two stacks of full-list
//! snapshots. Every mutating operation pushes a copy of the current list onto
//! `history` and clears `future`; [`NoteStore::undo`] and [`NoteStore::redo`]
//! move snapshots between the two stacks.

mod persist;

pub use persist::{NoteRepository, STORE_VERSION};

use std::cmp::Ordering;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::note::{Note, NoteDraft, NotePatch};

/// Default file name for exported notes.
pub const EXPORT_FILE_NAME: &str = "notes_export.json";

/// The note list and its undo/redo stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteStore {
    notes: Vec<Note>,
    #[serde(default)]
    history: Vec<Vec<Note>>,
    #[serde(default)]
    future: Vec<Vec<Note>>,
    #[serde(skip)]
    max_history: Option<usize>,
}

impl NoteStore {
    /// Create an empty store with unlimited history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `notes` with empty history.
    #[must_use]
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }

    /// Cap the number of undo snapshots kept. `None` means unlimited.
    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.set_history_limit(limit);
        self
    }

    /// Change the snapshot cap, trimming the oldest snapshots if needed.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.max_history = limit;
        self.enforce_history_limit();
    }

    /// All notes in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a note by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Number of notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether there are no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Number of snapshots available to undo.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of snapshots available to redo.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Whether [`NoteStore::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether [`NoteStore::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Append a new note built from `draft`.
    pub fn add_note(&mut self, draft: NoteDraft) -> &Note {
        self.checkpoint();
        let note = Note::from_draft(draft, Utc::now());
        debug!(id = %note.id, "Adding note");
        self.notes.push(note);
        let idx = self.notes.len() - 1;
        &self.notes[idx]
    }

    /// Merge `patch` into the note with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] if no note has that id. The store and
    /// its history are left untouched in that case.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Result<&Note> {
        let idx = self.position(id)?;
        self.checkpoint();
        debug!(id, "Updating note");
        self.notes[idx].apply(patch, Utc::now());
        Ok(&self.notes[idx])
    }

    /// Remove the note with the given id, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] if no note has that id.
    pub fn delete_note(&mut self, id: &str) -> Result<Note> {
        let idx = self.position(id)?;
        self.checkpoint();
        debug!(id, "Deleting note");
        Ok(self.notes.remove(idx))
    }

    /// Flip the pin flag of a note, returning the new value.
    ///
    /// Pinning does not change `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] if no note has that id.
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        let idx = self.position(id)?;
        self.checkpoint();
        let note = &mut self.notes[idx];
        note.is_pinned = !note.is_pinned;
        debug!(id, pinned = note.is_pinned, "Toggled pin");
        Ok(note.is_pinned)
    }

    /// Remove every note, returning how many were removed.
    ///
    /// Always records a snapshot, even when the store is already empty.
    pub fn clear_all_notes(&mut self) -> usize {
        self.checkpoint();
        let removed = self.notes.len();
        self.notes.clear();
        debug!(removed, "Cleared all notes");
        removed
    }

    /// Restore the previous snapshot. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.notes, previous);
        self.future.insert(0, current);
        debug!(
            history = self.history.len(),
            future = self.future.len(),
            "Undo"
        );
        true
    }

    /// Re-apply the next snapshot. Returns `false` if there is none.
    pub fn redo(&mut self) -> bool {
        if self.future.is_empty() {
            return false;
        }
        let next = self.future.remove(0);
        let current = std::mem::replace(&mut self.notes, next);
        self.history.push(current);
        self.enforce_history_limit();
        debug!(
            history = self.history.len(),
            future = self.future.len(),
            "Redo"
        );
        true
    }

    /// Drop both snapshot stacks.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.future.clear();
        debug!("Cleared history");
    }

    /// Notes in display order: pinned first, then most recently updated.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by(|a, b| display_order(a, b));
        notes
    }

    /// Pretty-printed JSON array of the current notes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.notes)?)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    fn checkpoint(&mut self) {
        self.history.push(self.notes.clone());
        self.future.clear();
        self.enforce_history_limit();
    }

    fn enforce_history_limit(&mut self) {
        if let Some(limit) = self.max_history {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }
}

fn display_order(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}
