// src/cli.rs
use crate::config::{self, Config};
use crate::console;
use crate::error::{AppError, AppResult};
use crate::menu;
use crate::models::Entry;
use crate::store::EntryStore;
use clap::{Parser, Subcommand};
use log;
use std::io::{self, Write};
use std::path::PathBuf;

/// A personal work log for the terminal.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = false)] // No subcommand opens the menu
pub struct Cli {
    /// Path to the SQLite database (overrides the config file)
    #[clap(short, long, value_parser, global = true)]
    pub database: Option<PathBuf>,

    /// Path to a TOML config file to use instead of the per-user one
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Create the database and its schema, then exit
    Init,
    /// Print every entry, newest first
    List,
    /// Open the interactive menu (the default)
    Menu,
}

/// Config file settings with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> AppResult<Config> {
    let mut config = config::load_config(cli.config.as_deref()).map_err(|e| {
        log::error!("Failed to load configuration: {:#}", e);
        AppError::Config(format!("{:#}", e))
    })?;
    if let Some(database) = &cli.database {
        log::debug!("Database path overridden on the command line: {:?}", database);
        config.database_path = database.clone();
    }
    Ok(config)
}

pub fn handle_cli_command(cli: Cli) -> AppResult<()> {
    log::debug!("Handling CLI command: {:?}", cli.command);
    let config = resolve_config(&cli)?;
    let store = EntryStore::open(&config.database_path)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init => {
            println!(
                "Work log ready at {:?} ({} entries).",
                config.database_path,
                store.count()?
            );
        }
        Commands::List => {
            let stdout = io::stdout();
            list_entries(&store, &mut stdout.lock())?;
        }
        Commands::Menu => {
            log::info!("Starting menu loop");
            let mut console = console::stdio(config.clear_screen);
            menu::menu_loop(&mut console, &store)?;
        }
    }

    store.close()?;
    Ok(())
}

/// One-line summary per entry, as printed by `list`.
pub fn format_entry_line(entry: &Entry) -> String {
    format!(
        "{} #{} {}: {} ({} min){}",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.id,
        entry.name,
        entry.task,
        entry.minutes,
        if entry.notes.is_empty() {
            String::new()
        } else {
            format!(" - {}", entry.notes)
        }
    )
}

pub fn list_entries<W: Write>(store: &EntryStore, out: &mut W) -> AppResult<()> {
    let entries = store.select_all()?;
    let write_result = if entries.is_empty() {
        writeln!(out, "No entries found.")
    } else {
        entries
            .iter()
            .try_for_each(|entry| writeln!(out, "{}", format_entry_line(entry)))
    };
    write_result.map_err(|e| AppError::Cli(format!("Failed to write entry list: {}", e)))?;
    log::info!("Listed {} entries", entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryFields;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_defaults_to_menu() {
        let cli = Cli::try_parse_from(["worklog"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.database, None);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["worklog", "list", "--database", "work.db"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));
        assert_eq!(cli.database, Some(PathBuf::from("work.db")));
    }

    #[test]
    fn test_parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["worklog", "export"]).is_err());
    }

    #[test]
    fn test_database_flag_overrides_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "database_path = \"from_config.db\"\nclear_screen = false\n").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let cli = Cli::try_parse_from(["worklog", "--config", config_arg]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.database_path, PathBuf::from("from_config.db"));
        assert!(!config.clear_screen);

        let cli = Cli::try_parse_from(["worklog", "-c", config_arg, "-d", "override.db"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap().database_path, PathBuf::from("override.db"));
    }

    #[test]
    fn test_broken_explicit_config_is_fatal() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("broken.toml");
        fs::write(&config_path, "clear_screen = = true").unwrap();
        let cli = Cli::try_parse_from(["worklog", "--config", config_path.to_str().unwrap()]).unwrap();
        assert!(matches!(resolve_config(&cli), Err(AppError::Config(_))));
    }

    #[test]
    fn test_init_creates_database() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let db_path = dir.path().join("fresh.db");
        fs::write(&config_path, "").unwrap();

        let cli = Cli::try_parse_from([
            "worklog",
            "--config",
            config_path.to_str().unwrap(),
            "--database",
            db_path.to_str().unwrap(),
            "init",
        ])
        .unwrap();
        handle_cli_command(cli).unwrap();
        assert!(db_path.exists());
        assert_eq!(EntryStore::open(&db_path).unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_list_entries() {
        let store = EntryStore::open_in_memory().unwrap();
        let mut out = Vec::new();
        list_entries(&store, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No entries found.\n");

        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        store
            .create_at(&EntryFields::new("alice", "build", 30, ""), day.and_hms_opt(9, 15, 0).unwrap())
            .unwrap();
        store
            .create_at(&EntryFields::new("bob", "test", 45, "flaky"), day.and_hms_opt(11, 0, 0).unwrap())
            .unwrap();

        let mut out = Vec::new();
        list_entries(&store, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2024-03-05 11:00 #2 bob: test (45 min) - flaky\n2024-03-05 09:15 #1 alice: build (30 min)\n"
        );
    }
}
