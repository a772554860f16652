// src/editor.rs
use crate::console::Console;
use crate::error::{AppResult, ConsoleResult, StoreError};
use crate::input::{take_date, take_minutes, take_optional_string, take_required_string};
use crate::models::{Entry, EntryFields};
use crate::store::EntryStore;
use std::io::{BufRead, Write};

const ENTRY_GONE_MSG: &str = "That entry no longer exists.";

/// How an edit or delete request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user said no; nothing was written.
    Declined,
    Applied,
    /// The row was already gone from the store.
    Vanished,
}

impl Outcome {
    /// Anything but a refusal means stored state may differ from what the caller holds.
    pub fn needs_refresh(self) -> bool {
        self != Outcome::Declined
    }
}

/// Collects the four editable fields.
pub fn take_entry<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ConsoleResult<EntryFields> {
    let name = take_required_string(console, "[REQUIRED] Enter your name: ")?;
    let task = take_required_string(console, "[REQUIRED] Enter task name: ")?;
    let minutes = take_minutes(console, "[INTEGER REQUIRED] Minutes the task took: ")?;
    let notes = take_optional_string(console, "[OPTIONAL] Enter your notes: ")?;
    Ok(EntryFields::new(name, task, minutes, notes))
}

/// Only an exact `y`/`Y` counts as yes.
fn confirmed<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ConsoleResult<bool> {
    Ok(console.prompt("Sure? [y/n] ")?.to_lowercase() == "y")
}

fn vanished<R: BufRead, W: Write>(console: &mut Console<R, W>, id: i64) -> AppResult<Outcome> {
    log::warn!("Entry {} disappeared before the change could be written", id);
    console.say(ENTRY_GONE_MSG)?;
    Ok(Outcome::Vanished)
}

/// Anything but an exact `n`/`N` at the save prompt commits the entry.
pub fn add_entry<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let fields = take_entry(console)?;
    if console.prompt("Save? [Y/N] ")?.to_lowercase() == "n" {
        log::info!("New entry for '{}' discarded", fields.name);
        return Ok(());
    }
    store.create(&fields)?;
    console.say("Saved")?;
    Ok(())
}

/// Re-collects every field and the date, then persists. `entry` is only
/// overwritten once the store accepted the change.
pub fn edit_entry<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &EntryStore,
    entry: &mut Entry,
) -> AppResult<Outcome> {
    if !confirmed(console)? {
        return Ok(Outcome::Declined);
    }
    let fields = take_entry(console)?;
    let timestamp = take_date(console, "Enter the date (YYYY-MM-DD): ")?;

    let mut edited = entry.clone();
    edited.apply(fields);
    edited.timestamp = timestamp;
    match store.update(&edited) {
        Ok(()) => {
            *entry = edited;
            Ok(Outcome::Applied)
        }
        Err(StoreError::NotFound(id)) => vanished(console, id),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_entry<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &EntryStore,
    entry: &Entry,
) -> AppResult<Outcome> {
    if !confirmed(console)? {
        return Ok(Outcome::Declined);
    }
    match store.delete(entry) {
        Ok(()) => Ok(Outcome::Applied),
        Err(StoreError::NotFound(id)) => vanished(console, id),
        Err(e) => Err(e.into()),
    }
}
