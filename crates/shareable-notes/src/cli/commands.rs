//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::editor::Format;
use crate::share::ShareTarget;
use crate::store::EXPORT_FILE_NAME;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Note title
    pub title: String,

    /// Note content (HTML)
    pub content: String,

    /// Pin the note
    #[arg(short, long)]
    pub pin: bool,

    /// Mark the note as encrypted
    #[arg(long)]
    pub encrypted: bool,

    /// Password stored with an encrypted note
    #[arg(long, requires = "encrypted")]
    pub password: Option<String>,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the note to edit
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New content (HTML)
    #[arg(long)]
    pub content: Option<String>,
}

/// Arguments for commands that act on a single note.
#[derive(Debug, Args)]
pub struct NoteArg {
    /// Note id
    pub id: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Undo history commands.
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Show how many snapshots can be undone and redone
    Show,

    /// Drop all undo and redo snapshots
    Clear,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Show full content instead of a preview
    #[arg(long)]
    pub full: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Note id
    pub id: String,

    /// Print content with glossary and grammar highlights
    #[arg(long)]
    pub highlight: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file
    #[arg(short, long, default_value = EXPORT_FILE_NAME)]
    pub output: PathBuf,
}

/// Insights command arguments.
#[derive(Debug, Args)]
pub struct InsightsCommand {
    /// Note id
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the glossary and grammar commands.
#[derive(Debug, Args)]
pub struct AnalysisCommand {
    /// Note id
    pub id: String,

    /// Print the highlighted HTML instead of a list
    #[arg(long)]
    pub highlight: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Share commands.
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Copy the note text to the clipboard
    Copy(NoteArg),

    /// Print a WhatsApp share link
    Whatsapp(NoteArg),

    /// Print a Gmail compose link
    Email(NoteArg),
}

impl ShareCommand {
    /// Id of the note being shared.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Copy(arg) | Self::Whatsapp(arg) | Self::Email(arg) => &arg.id,
        }
    }

    /// Where the note is going.
    #[must_use]
    pub fn target(&self) -> ShareTarget {
        match self {
            Self::Copy(_) => ShareTarget::Clipboard,
            Self::Whatsapp(_) => ShareTarget::WhatsApp,
            Self::Email(_) => ShareTarget::Email,
        }
    }
}

/// Format command arguments.
#[derive(Debug, Args)]
pub struct FormatCommand {
    /// Note id
    pub id: String,

    /// bold, italic, underline, left, center, right, or a size (12px-20px)
    pub format: Format,

    /// Only format the first occurrence of this text
    #[arg(short, long)]
    pub text: Option<String>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_share_command_target() {
        let arg = || NoteArg {
            id: "n1".to_string(),
        };
        assert_eq!(ShareCommand::Copy(arg()).target(), ShareTarget::Clipboard);
        assert_eq!(ShareCommand::Whatsapp(arg()).target(), ShareTarget::WhatsApp);
        assert_eq!(ShareCommand::Email(arg()).target(), ShareTarget::Email);
        assert_eq!(ShareCommand::Email(arg()).id(), "n1");
    }

    #[test]
    fn test_export_default_path() {
        let cmd = ExportCommand {
            output: PathBuf::from(EXPORT_FILE_NAME),
        };
        assert_eq!(cmd.output, PathBuf::from("notes_export.json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
