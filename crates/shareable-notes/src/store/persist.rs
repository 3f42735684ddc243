//! Persistence of the note store into local storage.
//!
//! The whole store (notes and both snapshot stacks) is written under a
//! single key as `{"state": {...}, "version": N}` after every change and
//! read back when the repository is opened.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::NoteStore;
use crate::error::{Error, Result};
use crate::note::{Note, NoteDraft, NotePatch};
use crate::storage::Storage;

/// Version written into every envelope.
pub const STORE_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// A [`NoteStore`] bound to a storage key, saved after every change.
#[derive(Debug)]
pub struct NoteRepository {
    storage: Storage,
    key: String,
    store: NoteStore,
}

impl NoteRepository {
    /// Rehydrate the store saved under `key`, or start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read or parsed, or if it
    /// was written with a different store version.
    pub fn open(storage: Storage, key: impl Into<String>, history_limit: Option<usize>) -> Result<Self> {
        let key = key.into();
        let store = match storage.get_item(&key)? {
            Some(raw) => {
                let envelope: Envelope<NoteStore> = serde_json::from_str(&raw)?;
                if envelope.version != STORE_VERSION {
                    return Err(Error::StoreVersion {
                        key,
                        found: envelope.version,
                        expected: STORE_VERSION,
                    });
                }
                info!(
                    key = %key,
                    notes = envelope.state.len(),
                    "Rehydrated note store"
                );
                envelope.state
            }
            None => {
                debug!(key = %key, "No stored notes, starting empty");
                NoteStore::new()
            }
        }
        .with_history_limit(history_limit);

        Ok(Self {
            storage,
            key,
            store,
        })
    }

    /// The in-memory store.
    #[must_use]
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// The backing storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The key the store is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Look up a note by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] if no note has that id.
    pub fn require(&self, id: &str) -> Result<&Note> {
        self.store.get(id).ok_or_else(|| Error::not_found(id))
    }

    /// Write the current store to storage.
    ///
    /// Returns `false` if the stored copy was already up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<bool> {
        let envelope = Envelope {
            state: &self.store,
            version: STORE_VERSION,
        };
        let raw = serde_json::to_string(&envelope)?;
        self.storage.set_item(&self.key, &raw)
    }

    /// Add a note and save.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn add_note(&mut self, draft: NoteDraft) -> Result<Note> {
        let note = self.store.add_note(draft).clone();
        self.save()?;
        Ok(note)
    }

    /// Update a note and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] for an unknown id, or an error if saving fails.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Result<Note> {
        let note = self.store.update_note(id, patch)?.clone();
        self.save()?;
        Ok(note)
    }

    /// Delete a note and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] for an unknown id, or an error if saving fails.
    pub fn delete_note(&mut self, id: &str) -> Result<Note> {
        let note = self.store.delete_note(id)?;
        self.save()?;
        Ok(note)
    }

    /// Toggle a note's pin and save. Returns the new pin state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoteNotFound`] for an unknown id, or an error if saving fails.
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        let pinned = self.store.toggle_pin(id)?;
        self.save()?;
        Ok(pinned)
    }

    /// Remove every note and save. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn clear_all_notes(&mut self) -> Result<usize> {
        let removed = self.store.clear_all_notes();
        self.save()?;
        Ok(removed)
    }

    /// Undo the last change and save. Returns `false` if there was nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn undo(&mut self) -> Result<bool> {
        let changed = self.store.undo();
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Redo the last undone change and save. Returns `false` if there was nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn redo(&mut self) -> Result<bool> {
        let changed = self.store.redo();
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Drop the undo/redo stacks and save.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn clear_history(&mut self) -> Result<()> {
        self.store.clear_history();
        self.save()?;
        Ok(())
    }
}
