//! Error types for shareable-notes.
//!
//! This module defines all error types used throughout the shareable-notes crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for shareable-notes operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The persisted store was written by an incompatible version.
    #[error("stored notes under '{key}' have version {found}, expected {expected}")]
    StoreVersion {
        /// Storage key the envelope was read from.
        key: String,
        /// Version found in storage.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Note Errors ===
    /// No note with the given id exists.
    #[error("note {id} not found")]
    NoteNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A note draft or patch was rejected.
    #[error("invalid note: {message}")]
    InvalidNote {
        /// Why the note was rejected.
        message: String,
    },

    /// An editor formatting command could not be parsed.
    #[error("invalid format '{value}': {message}")]
    InvalidFormat {
        /// The rejected input.
        value: String,
        /// What was expected instead.
        message: String,
    },

    // === Insights Errors ===
    /// No API key is configured for remote insights.
    #[error("API key is not configured. Set insights.api_key or GROQ_API_KEY.")]
    MissingApiKey,

    /// The note had nothing left to analyze after cleaning.
    #[error("Please enter some text to analyze.")]
    EmptyContent,

    /// The insights service rejected the request or returned garbage.
    #[error("{0}")]
    Insights(String),

    // === Platform Errors ===
    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for shareable-notes operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a note-not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NoteNotFound { id: id.into() }
    }

    /// Create an invalid note error.
    #[must_use]
    pub fn invalid_note(message: impl Into<String>) -> Self {
        Self::InvalidNote {
            message: message.into(),
        }
    }

    /// Create an invalid format error.
    #[must_use]
    pub fn invalid_format(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create an insights service error.
    #[must_use]
    pub fn insights(message: impl Into<String>) -> Self {
        Self::Insights(message.into())
    }

    /// Create a clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Check if this error means a note id did not resolve.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound { .. })
    }
}
