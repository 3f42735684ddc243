//! Core note types for shareable-notes.
//!
//! A [`Note`] is a user-authored record with a plain-text title and an HTML
//! body. [`NoteDraft`] is what callers hand the store to create one and
//! [`NotePatch`] is a partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::strip_tags;
use crate::error::{Error, Result};

/// Plain-text length above which a note preview is cut with "Read more".
pub const PREVIEW_CHARS: usize = 100;

/// A single note.
///
/// Serialized with camelCase field names so that exported and stored JSON
/// keeps the `isPinned` / `createdAt` / `updatedAt` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Random UUID assigned when the note is added.
    pub id: String,

    /// Plain-text title.
    pub title: String,

    /// Rich-text HTML body.
    pub content: String,

    /// Pinned notes sort before everything else.
    pub is_pinned: bool,

    /// When the note was added.
    pub created_at: DateTime<Utc>,

    /// When the note was last updated. Pinning does not count.
    pub updated_at: DateTime<Utc>,

    /// Marks the note as locked. Stored as-is; nothing is encrypted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,

    /// Password associated with a locked note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Note {
    /// Build a note from a draft, assigning a fresh id and timestamps.
    #[must_use]
    pub fn from_draft(draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            is_pinned: draft.is_pinned,
            created_at: now,
            updated_at: now,
            is_encrypted: draft.is_encrypted,
            password: draft.password,
        }
    }

    /// Merge a patch into this note and bump `updated_at`.
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(is_pinned) = patch.is_pinned {
            self.is_pinned = is_pinned;
        }
        if let Some(is_encrypted) = patch.is_encrypted {
            self.is_encrypted = Some(is_encrypted);
        }
        if let Some(password) = patch.password {
            self.password = Some(password);
        }
        self.updated_at = now;
    }

    /// The content with all markup removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        strip_tags(&self.content)
    }

    /// Whether the plain text is long enough to need a "Read more" cut.
    #[must_use]
    pub fn needs_read_more(&self) -> bool {
        self.plain_text().chars().count() > PREVIEW_CHARS
    }

    /// First [`PREVIEW_CHARS`] characters of the plain text.
    #[must_use]
    pub fn preview(&self) -> String {
        let plain = self.plain_text();
        let mut preview: String = plain.chars().take(PREVIEW_CHARS).collect();
        if plain.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview.replace('\n', " ")
    }

    /// Whether the note is marked as locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_encrypted.unwrap_or(false)
    }
}

/// Input for adding a note: everything but the id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    /// Plain-text title.
    pub title: String,
    /// Rich-text HTML body.
    pub content: String,
    /// Whether the note starts pinned.
    #[serde(default)]
    pub is_pinned: bool,
    /// Lock flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    /// Lock password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NoteDraft {
    /// Create an unpinned, unlocked draft.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Trim title and content and reject the draft if either ends up empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNote`] when the title or content is blank.
    pub fn validated(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        if self.title.is_empty() {
            return Err(Error::invalid_note("title must not be empty"));
        }
        if self.content.is_empty() {
            return Err(Error::invalid_note("content must not be empty"));
        }
        Ok(self)
    }
}

/// A partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New pin state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    /// New lock flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    /// New lock password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NotePatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_pinned.is_none()
            && self.is_encrypted.is_none()
            && self.password.is_none()
    }

    /// Trim text fields and reject blank title or content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNote`] when a present title or content is blank,
    /// or when the patch changes nothing.
    pub fn validated(mut self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::invalid_note("nothing to update"));
        }
        if let Some(title) = self.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::invalid_note("title must not be empty"));
            }
            self.title = Some(title);
        }
        if let Some(content) = self.content.take() {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Err(Error::invalid_note("content must not be empty"));
            }
            self.content = Some(content);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Note {
        Note::from_draft(NoteDraft::new("Groceries", "<p>Milk and eggs</p>"), Utc::now())
    }

    #[test]
    fn test_from_draft_assigns_id_and_timestamps() {
        let now = Utc::now();
        let note = Note::from_draft(NoteDraft::new("T", "C"), now);

        assert!(Uuid::parse_str(&note.id).is_ok());
        assert_eq!(note.created_at, now);
        assert_eq!(note.updated_at, now);
        assert!(!note.is_pinned);
        assert!(note.is_encrypted.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_patch_merges_and_bumps_updated() {
        let mut note = sample();
        let created = note.created_at;
        let later = note.updated_at + Duration::seconds(5);

        note.apply(
            NotePatch {
                title: Some("Shopping".to_string()),
                ..NotePatch::default()
            },
            later,
        );

        assert_eq!(note.title, "Shopping");
        assert_eq!(note.content, "<p>Milk and eggs</p>");
        assert_eq!(note.created_at, created);
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_serializes_camel_case() {
        let note = sample();
        let json = serde_json::to_string(&note).unwrap();

        assert!(json.contains("\"isPinned\":false"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("isEncrypted"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_deserializes_browser_shape() {
        let json = r#"{
            "id": "5d1c6a3e-0000-4000-8000-000000000000",
            "title": "Old",
            "content": "<b>hi</b>",
            "isPinned": true,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z",
            "isEncrypted": true,
            "password": "pw"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();

        assert!(note.is_pinned);
        assert!(note.is_locked());
        assert_eq!(note.password.as_deref(), Some("pw"));
        assert!(note.updated_at > note.created_at);
    }

    #[test]
    fn test_plain_text_and_preview() {
        let mut note = sample();
        assert_eq!(note.plain_text(), "Milk and eggs");
        assert!(!note.needs_read_more());

        note.content = format!("<p>{}</p>", "a".repeat(150));
        assert!(note.needs_read_more());
        assert_eq!(note.preview().chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_draft_validation_trims() {
        let draft = NoteDraft::new("  Title  ", "  body ").validated().unwrap();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.content, "body");
    }

    #[test]
    fn test_draft_validation_rejects_blank() {
        assert!(NoteDraft::new("   ", "body").validated().is_err());
        assert!(NoteDraft::new("title", "\n\t").validated().is_err());
    }

    #[test]
    fn test_patch_validation() {
        assert!(NotePatch::default().validated().is_err());

        let blank_title = NotePatch {
            title: Some(" ".to_string()),
            ..NotePatch::default()
        };
        assert!(blank_title.validated().is_err());

        let ok = NotePatch {
            content: Some("  new body ".to_string()),
            ..NotePatch::default()
        }
        .validated()
        .unwrap();
        assert_eq!(ok.content.as_deref(), Some("new body"));
    }
}
