// src/browse.rs
use crate::console::Console;
use crate::editor::{delete_entry, edit_entry, Outcome};
use crate::error::AppResult;
use crate::models::Entry;
use crate::search::SearchFilter;
use crate::store::EntryStore;
use std::io::{BufRead, Write};

pub const NO_RESULTS_PROMPT: &str = "No Results, press any key to go back: ";

/// A single keystroke (or page number) typed while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Quit,
    Next,
    Previous,
    Delete,
    Edit,
    /// 1-based page number as typed.
    Jump(usize),
    Ignore,
}

impl BrowseAction {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "q" => BrowseAction::Quit,
            "n" => BrowseAction::Next,
            "p" => BrowseAction::Previous,
            "d" => BrowseAction::Delete,
            "e" => BrowseAction::Edit,
            other => other
                .parse::<usize>()
                .map(BrowseAction::Jump)
                .unwrap_or(BrowseAction::Ignore),
        }
    }
}

/// Position within a filtered, newest-first result set.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    entries: Vec<Entry>,
    index: usize,
}

impl BrowseState {
    pub fn new(entries: Vec<Entry>) -> Self {
        BrowseState { entries, index: 0 }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.entries.len()
    }

    pub fn next(&mut self) {
        if !self.is_last() {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        if !self.is_first() {
            self.index -= 1;
        }
    }

    /// Moves to 1-based `page` if it exists. Returns whether the index moved.
    pub fn jump(&mut self, page: usize) -> bool {
        match page.checked_sub(1) {
            Some(target) if target < self.entries.len() => {
                self.index = target;
                true
            }
            _ => false,
        }
    }

    /// Swaps in a re-queried result set, keeping the index inside it.
    pub fn refresh(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.index = self.index.min(self.entries.len().saturating_sub(1));
    }
}

/// Pages through the entries matching `filter` one at a time until the user quits.
///
/// The result set is re-queried after every confirmed edit or delete, and
/// when either finds its entry already gone, so the page on screen always
/// reflects what is stored.
pub fn browse<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &EntryStore,
    filter: &SearchFilter,
) -> AppResult<()> {
    let mut state = BrowseState::new(store.filter(filter)?);

    loop {
        let Some(entry) = state.current().cloned() else {
            console.clear()?;
            console.prompt(NO_RESULTS_PROMPT)?;
            return Ok(());
        };

        console.clear()?;
        render_page(console, &state, &entry)?;
        let action = BrowseAction::parse(&console.prompt("Action: ")?);
        log::debug!("Browse action {:?} at index {}", action, state.index());

        match action {
            BrowseAction::Quit => return Ok(()),
            BrowseAction::Next => state.next(),
            BrowseAction::Previous => state.previous(),
            BrowseAction::Jump(page) => {
                state.jump(page);
            }
            BrowseAction::Delete => {
                let outcome = delete_entry(console, store, &entry)?;
                if outcome == Outcome::Applied {
                    state.previous();
                }
                if outcome.needs_refresh() {
                    state.refresh(store.filter(filter)?);
                }
            }
            BrowseAction::Edit => {
                let mut entry = entry;
                if edit_entry(console, store, &mut entry)?.needs_refresh() {
                    state.refresh(store.filter(filter)?);
                }
            }
            BrowseAction::Ignore => {}
        }
    }
}

fn render_page<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &BrowseState,
    entry: &Entry,
) -> AppResult<()> {
    let total = state.entries().len();
    for (position, listed) in state.entries().iter().enumerate() {
        console.say(&format!("{}) {}", position + 1, listed.task))?;
    }
    console.say("")?;
    console.say(&format!("Page {} of {}", state.index() + 1, total))?;

    let date = entry.long_date();
    let rule = "=".repeat(date.len());
    console.say(&date)?;
    console.say(&rule)?;
    console.say(&format!("ID: {}", entry.id))?;
    console.say(&format!("Name: {}", entry.name))?;
    console.say(&format!("Task: {}", entry.task))?;
    console.say(&format!("Minutes: {}", entry.minutes))?;
    console.say(&format!("Notes: {}", entry.notes))?;
    console.say(&rule)?;

    console.say(if state.is_last() { "No Further Pages" } else { "n) Next entry" })?;
    console.say(if state.is_first() { "No Previous Pages" } else { "p) Previous entry" })?;
    console.say("q) Return to menu")?;
    console.say("d) Delete entry")?;
    console.say("e) Edit entry")?;
    console.say(&format!("[1-{}]) Jump to entry", total))?;
    Ok(())
}
