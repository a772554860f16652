// src/menu.rs
use crate::browse::browse;
use crate::console::Console;
use crate::editor::add_entry;
use crate::error::{AppResult, ConsoleError};
use crate::search::{self, SearchFilter};
use crate::store::EntryStore;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Add,
    View,
    SearchTerm,
    SearchEmployee,
    SearchMinutes,
    SearchDate,
    SearchRange,
    Quit,
}

impl MenuCommand {
    /// Commands in display order. `Quit` is announced separately.
    pub const LISTED: [MenuCommand; 7] = [
        MenuCommand::Add,
        MenuCommand::View,
        MenuCommand::SearchTerm,
        MenuCommand::SearchEmployee,
        MenuCommand::SearchMinutes,
        MenuCommand::SearchDate,
        MenuCommand::SearchRange,
    ];

    pub fn key(self) -> char {
        match self {
            MenuCommand::Add => 'a',
            MenuCommand::View => 'v',
            MenuCommand::SearchTerm => 't',
            MenuCommand::SearchEmployee => 'p',
            MenuCommand::SearchMinutes => 'm',
            MenuCommand::SearchDate => 's',
            MenuCommand::SearchRange => 'r',
            MenuCommand::Quit => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::Add => "Add Entry",
            MenuCommand::View => "View Entries",
            MenuCommand::SearchTerm => "Search by Term",
            MenuCommand::SearchEmployee => "Search by Employee",
            MenuCommand::SearchMinutes => "Search by Minutes",
            MenuCommand::SearchDate => "Search by Date",
            MenuCommand::SearchRange => "Search by Date Range",
            MenuCommand::Quit => "Quit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let choice = input.trim().to_lowercase();
        let mut chars = choice.chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if key == MenuCommand::Quit.key() {
            return Some(MenuCommand::Quit);
        }
        MenuCommand::LISTED.into_iter().find(|command| command.key() == key)
    }
}

/// Top-level REPL. Ends on `q` or when input closes.
pub fn menu_loop<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    loop {
        console.clear()?;
        console.say("Enter 'q' to quit.")?;
        for command in MenuCommand::LISTED {
            console.say(&format!("{}) {}", command.key(), command.label()))?;
        }

        let choice = match console.prompt("Action: ") {
            Ok(choice) => choice,
            Err(ConsoleError::Closed) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let Some(command) = MenuCommand::parse(&choice) else {
            log::debug!("Ignoring unrecognised menu input {:?}", choice);
            continue;
        };
        log::debug!("Menu command {:?}", command);
        if command == MenuCommand::Quit {
            return Ok(());
        }

        console.clear()?;
        match run_command(console, store, command) {
            Err(e) if e.is_input_closed() => return Ok(()),
            result => result?,
        }
    }
}

fn run_command<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &EntryStore,
    command: MenuCommand,
) -> AppResult<()> {
    match command {
        MenuCommand::Add => add_entry(console, store),
        MenuCommand::View => browse(console, store, &SearchFilter::All),
        MenuCommand::SearchTerm => search::search_term(console, store),
        MenuCommand::SearchEmployee => search::search_employee(console, store),
        MenuCommand::SearchMinutes => search::search_minutes(console, store),
        MenuCommand::SearchDate => search::search_date(console, store),
        MenuCommand::SearchRange => search::search_range(console, store),
        MenuCommand::Quit => Ok(()),
    }
}
