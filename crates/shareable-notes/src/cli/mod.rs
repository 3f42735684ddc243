//! Command-line interface for shareable-notes.
//!
//! This module provides the CLI structure for the `snotes` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, AnalysisCommand, ClearCommand, ConfigCommand, EditCommand, ExportCommand,
    FormatCommand, HistoryCommand, InsightsCommand, ListCommand, NoteArg, OutputFormat,
    ShareCommand, ShowCommand, StatusCommand,
};

/// snotes - Rich-text notes you can share
///
/// Create, edit, pin and share short HTML notes with undo/redo, local
/// insights and optional AI analysis. Notes live in a local database.
#[derive(Debug, Parser)]
#[command(name = "snotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a note
    Add(AddCommand),

    /// Change a note's title or content
    Edit(EditCommand),

    /// Delete a note
    Delete(NoteArg),

    /// Toggle a note's pin
    Pin(NoteArg),

    /// Delete every note
    Clear(ClearCommand),

    /// Undo the last change
    Undo,

    /// Redo the last undone change
    Redo,

    /// Inspect or clear undo history
    #[command(subcommand)]
    History(HistoryCommand),

    /// List notes, pinned first then most recently updated
    List(ListCommand),

    /// Show one note
    Show(ShowCommand),

    /// Export all notes as JSON
    Export(ExportCommand),

    /// Show rule-based insights for a note
    Insights(InsightsCommand),

    /// Show glossary terms for a note
    Glossary(AnalysisCommand),

    /// Show grammar hints for a note
    Grammar(AnalysisCommand),

    /// Ask the AI service to analyze a note
    Analyze(NoteArg),

    /// Share a note
    #[command(subcommand)]
    Share(ShareCommand),

    /// Apply rich-text formatting to a note
    Format(FormatCommand),

    /// Show storage and history status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Format;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "snotes");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["snotes", "add", "Title", "<p>Body</p>", "--pin"]).unwrap();
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.title, "Title");
                assert_eq!(cmd.content, "<p>Body</p>");
                assert!(cmd.pin);
                assert!(!cmd.encrypted);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_password_requires_encrypted() {
        let result = Cli::try_parse_from(["snotes", "add", "T", "C", "--password", "pw"]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["snotes", "add", "T", "C", "--encrypted", "--password", "pw"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Add(AddCommand {
                encrypted: true,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from(["snotes", "edit", "abc", "--title", "New"]).unwrap();
        match cli.command {
            Command::Edit(cmd) => {
                assert_eq!(cmd.id, "abc");
                assert_eq!(cmd.title.as_deref(), Some("New"));
                assert!(cmd.content.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history() {
        let cli = Cli::try_parse_from(["snotes", "history", "clear"]).unwrap();
        assert!(matches!(cli.command, Command::History(HistoryCommand::Clear)));
    }

    #[test]
    fn test_parse_share() {
        let cli = Cli::try_parse_from(["snotes", "share", "whatsapp", "abc"]).unwrap();
        match cli.command {
            Command::Share(cmd) => assert_eq!(cmd.id(), "abc"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_format() {
        let cli =
            Cli::try_parse_from(["snotes", "format", "abc", "bold", "--text", "hi"]).unwrap();
        match cli.command {
            Command::Format(cmd) => {
                assert_eq!(cmd.format, Format::Bold);
                assert_eq!(cmd.text.as_deref(), Some("hi"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_format_rejects_bad_size() {
        assert!(Cli::try_parse_from(["snotes", "format", "abc", "13px"]).is_err());
    }

    #[test]
    fn test_parse_list_json() {
        let cli = Cli::try_parse_from(["snotes", "list", "--format", "json"]).unwrap();
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["snotes", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["snotes", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
