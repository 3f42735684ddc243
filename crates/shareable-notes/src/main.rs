//! `snotes` - CLI for shareable-notes
//!
//! This binary provides the command-line interface for creating, editing,
//! analyzing and sharing notes stored in the local note database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::error::Error as StdError;
use std::path::PathBuf;

use clap::Parser;

use shareable_notes::analysis::{
    check_grammar, generate_insights, highlight_glossary, highlight_grammar, identify_key_terms,
};
use shareable_notes::cli::{
    AddCommand, AnalysisCommand, ClearCommand, Cli, Command, ConfigCommand, EditCommand,
    ExportCommand, FormatCommand, HistoryCommand, InsightsCommand, ListCommand, OutputFormat,
    ShareCommand, ShowCommand,
};
use shareable_notes::editor::EditorSession;
use shareable_notes::share::{self, ShareTarget, SystemClipboard};
use shareable_notes::{
    init_logging, Config, InsightsClient, Note, NoteDraft, NotePatch, NoteRepository, Storage,
};

type CliResult = Result<(), Box<dyn StdError>>;

fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Configuration commands must work even without a database
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(cli.config, config_cmd),
        other => other,
    };

    let config = Config::load_from(cli.config)?;
    let storage = Storage::open(config.database_path())?;
    let mut repo =
        NoteRepository::open(storage, config.storage.key.clone(), config.history_limit())?;

    match command {
        Command::Add(cmd) => handle_add(&mut repo, cmd),
        Command::Edit(cmd) => handle_edit(&mut repo, cmd),
        Command::Delete(arg) => {
            let note = repo.delete_note(&arg.id)?;
            println!("Deleted \"{}\"", note.title);
            Ok(())
        }
        Command::Pin(arg) => {
            let pinned = repo.toggle_pin(&arg.id)?;
            println!("{}", if pinned { "Pinned" } else { "Unpinned" });
            Ok(())
        }
        Command::Clear(cmd) => handle_clear(&mut repo, &cmd),
        Command::Undo => {
            println!("{}", if repo.undo()? { "Undone" } else { "Nothing to undo" });
            Ok(())
        }
        Command::Redo => {
            println!("{}", if repo.redo()? { "Redone" } else { "Nothing to redo" });
            Ok(())
        }
        Command::History(cmd) => handle_history(&mut repo, &cmd),
        Command::List(cmd) => handle_list(&repo, &cmd),
        Command::Show(cmd) => handle_show(&repo, &cmd),
        Command::Export(cmd) => handle_export(&repo, &cmd),
        Command::Insights(cmd) => handle_insights(&repo, &cmd),
        Command::Glossary(cmd) => handle_glossary(&repo, &cmd),
        Command::Grammar(cmd) => handle_grammar(&repo, &cmd),
        Command::Analyze(arg) => handle_analyze(&config, &repo, &arg.id),
        Command::Share(cmd) => handle_share(&repo, &cmd),
        Command::Format(cmd) => handle_format(&mut repo, cmd),
        Command::Status(cmd) => handle_status(&config, &repo, cmd.json),
        Command::Config(_) => Ok(()),
    }
}

fn handle_add(repo: &mut NoteRepository, cmd: AddCommand) -> CliResult {
    let draft = NoteDraft {
        title: cmd.title,
        content: cmd.content,
        is_pinned: cmd.pin,
        is_encrypted: cmd.encrypted.then_some(true),
        password: cmd.password,
    }
    .validated()?;
    let note = repo.add_note(draft)?;
    println!("{}", note.id);
    Ok(())
}

fn handle_edit(repo: &mut NoteRepository, cmd: EditCommand) -> CliResult {
    let patch = NotePatch {
        title: cmd.title,
        content: cmd.content,
        ..NotePatch::default()
    }
    .validated()?;
    let note = repo.update_note(&cmd.id, patch)?;
    println!("Updated \"{}\"", note.title);
    Ok(())
}

fn handle_clear(repo: &mut NoteRepository, cmd: &ClearCommand) -> CliResult {
    let count = repo.store().len();
    if !cmd.yes {
        println!("This will delete all {count} notes. It can be undone with `snotes undo`.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    let removed = repo.clear_all_notes()?;
    println!("Deleted {removed} notes");
    Ok(())
}

fn handle_history(repo: &mut NoteRepository, cmd: &HistoryCommand) -> CliResult {
    match cmd {
        HistoryCommand::Show => {
            let store = repo.store();
            println!("Undo snapshots: {}", store.history_len());
            println!("Redo snapshots: {}", store.future_len());
        }
        HistoryCommand::Clear => {
            repo.clear_history()?;
            println!("History cleared");
        }
    }
    Ok(())
}

fn handle_list(repo: &NoteRepository, cmd: &ListCommand) -> CliResult {
    let notes = repo.store().sorted();
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&notes)?),
        OutputFormat::Plain => {
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for note in notes {
                print_summary(note, cmd.full);
            }
        }
    }
    Ok(())
}

fn print_summary(note: &Note, full: bool) {
    let marker = if note.is_pinned { "*" } else { " " };
    println!(
        "{marker} {}  {}  ({})",
        note.id,
        note.title,
        note.updated_at.format("%Y-%m-%d %H:%M")
    );
    if note.is_locked() {
        println!("    [locked]");
    } else if full {
        println!("    {}", note.plain_text());
    } else {
        println!("    {}", note.preview());
    }
}

fn handle_show(repo: &NoteRepository, cmd: &ShowCommand) -> CliResult {
    let note = repo.require(&cmd.id)?;
    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(note)?);
        return Ok(());
    }

    println!("{}", note.title);
    println!("{}", "-".repeat(note.title.chars().count().max(3)));
    println!("Id:       {}", note.id);
    println!("Pinned:   {}", note.is_pinned);
    println!("Created:  {}", note.created_at.to_rfc3339());
    println!("Updated:  {}", note.updated_at.to_rfc3339());
    if note.is_locked() {
        println!("Locked:   true");
    }
    println!();
    if cmd.highlight {
        println!("{}", highlight_grammar(&highlight_glossary(&note.content)));
    } else {
        println!("{}", note.plain_text());
    }
    Ok(())
}

fn handle_export(repo: &NoteRepository, cmd: &ExportCommand) -> CliResult {
    let json = repo.store().export_json()?;
    std::fs::write(&cmd.output, json)?;
    println!(
        "Exported {} notes to {}",
        repo.store().len(),
        cmd.output.display()
    );
    Ok(())
}

fn handle_insights(repo: &NoteRepository, cmd: &InsightsCommand) -> CliResult {
    let note = repo.require(&cmd.id)?;
    let insights = generate_insights(&note.content);
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
        OutputFormat::Plain => {
            if insights.is_empty() {
                println!("No insights for this note.");
            }
            for insight in &insights {
                println!("- {insight}");
            }
        }
    }
    Ok(())
}

fn handle_glossary(repo: &NoteRepository, cmd: &AnalysisCommand) -> CliResult {
    let note = repo.require(&cmd.id)?;
    if cmd.highlight {
        println!("{}", highlight_glossary(&note.content));
        return Ok(());
    }
    let terms = identify_key_terms(&note.plain_text());
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&terms)?),
        OutputFormat::Plain => {
            if terms.is_empty() {
                println!("No glossary terms found.");
            }
            for term in &terms {
                println!("{}: {}", term.term, term.definition);
            }
        }
    }
    Ok(())
}

fn handle_grammar(repo: &NoteRepository, cmd: &AnalysisCommand) -> CliResult {
    let note = repo.require(&cmd.id)?;
    if cmd.highlight {
        println!("{}", highlight_grammar(&note.content));
        return Ok(());
    }
    let issues = check_grammar(&note.plain_text());
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&issues)?),
        OutputFormat::Plain => {
            if issues.is_empty() {
                println!("No grammar issues found.");
            }
            for issue in &issues {
                println!("\"{}\": {}", issue.text, issue.error);
            }
        }
    }
    Ok(())
}

fn handle_analyze(config: &Config, repo: &NoteRepository, id: &str) -> CliResult {
    let note = repo.require(id)?;
    let client = InsightsClient::from_config(config);
    let insights = client.analyze(&note.content)?;

    println!("Summary");
    println!("{}", insights.summary);
    if !insights.themes.is_empty() {
        println!();
        println!("Key themes");
        println!("{}", insights.themes);
    }
    if !insights.recommendations.is_empty() {
        println!();
        println!("Recommendations");
        println!("{}", insights.recommendations);
    }
    Ok(())
}

fn handle_share(repo: &NoteRepository, cmd: &ShareCommand) -> CliResult {
    let note = repo.require(cmd.id())?;
    match cmd.target() {
        ShareTarget::Clipboard => {
            share::copy_to_clipboard(note, &mut SystemClipboard)?;
            println!("Copied \"{}\" to clipboard", note.title);
        }
        target => {
            if let Some(url) = share::prepare_link(note, target) {
                println!("{url}");
            }
        }
    }
    Ok(())
}

fn handle_format(repo: &mut NoteRepository, cmd: FormatCommand) -> CliResult {
    let mut editor = EditorSession::new(repo.require(&cmd.id)?.content.clone());
    match &cmd.text {
        Some(selection) => {
            if editor.apply_to(cmd.format, selection).is_none() {
                return Err(format!("text \"{selection}\" not found in note {}", cmd.id).into());
            }
        }
        None => {
            editor.apply(cmd.format);
        }
    }

    let patch = NotePatch {
        content: Some(editor.into_content()),
        ..NotePatch::default()
    };
    let note = repo.update_note(&cmd.id, patch)?;
    println!("{}", note.content);
    Ok(())
}

fn handle_status(config: &Config, repo: &NoteRepository, json: bool) -> CliResult {
    let store = repo.store();
    let stats = repo.storage().stats()?;
    let pinned = store.notes().iter().filter(|n| n.is_pinned).count();

    if json {
        let status = serde_json::json!({
            "database_path": repo.storage().path(),
            "storage_key": repo.key(),
            "notes": store.len(),
            "pinned": pinned,
            "undo_snapshots": store.history_len(),
            "redo_snapshots": store.future_len(),
            "stored_keys": stats.total_keys,
            "stored_bytes": stats.total_value_bytes,
            "database_bytes": stats.db_size_bytes,
            "last_write": stats.last_write.map(|t| t.to_rfc3339()),
            "ai_configured": config.api_key().is_some(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("snotes status");
        println!("-------------");
        println!("Database:      {}", repo.storage().path().display());
        println!("Storage key:   {}", repo.key());
        println!("Notes:         {} ({pinned} pinned)", store.len());
        println!(
            "History:       {} undo / {} redo",
            store.history_len(),
            store.future_len()
        );
        println!(
            "Stored:        {} keys, {} bytes",
            stats.total_keys, stats.total_value_bytes
        );
        if let Some(last) = stats.last_write {
            println!("Last write:    {}", last.to_rfc3339());
        }
        println!(
            "AI insights:   {}",
            if config.api_key().is_some() {
                "configured"
            } else {
                "no API key"
            }
        );
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[History]");
                match config.history_limit() {
                    Some(limit) => println!("  Max snapshots:      {limit}"),
                    None => println!("  Max snapshots:      unlimited"),
                }
                println!();
                println!("[Insights]");
                println!("  Endpoint:           {}", config.insights.endpoint);
                println!("  Model:              {}", config.insights.model);
                println!("  Temperature:        {}", config.insights.temperature);
                println!("  Max tokens:         {}", config.insights.max_tokens);
                println!("  Timeout (secs):     {}", config.insights.timeout_secs);
                println!(
                    "  API key:            {}",
                    if config.api_key().is_some() {
                        "set"
                    } else {
                        "not set"
                    }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
