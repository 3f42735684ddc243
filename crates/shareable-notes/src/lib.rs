//! `shareable-notes` - Rich-text notes with undo/redo, insights and sharing
//!
//! This library provides the note store and its local persistence, the
//! heuristic analysis and editing helpers, and the sharing and remote AI
//! integrations used by the `snotes` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod note;
pub mod share;
pub mod storage;
pub mod store;

pub use ai::{AiInsights, InsightsClient};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use note::{Note, NoteDraft, NotePatch};
pub use storage::{Storage, StorageStats};
pub use store::{NoteRepository, NoteStore};
