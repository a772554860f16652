// src/models.rs
use chrono::NaiveDateTime;

use crate::error::{StoreError, StoreResult};

/// Display format for the detail view, e.g. "March 05, 2024".
pub const LONG_DATE_FORMAT: &str = "%B %d, %Y";
/// Format used for all date input and search filters.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// One persisted work-log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub task: String,
    pub minutes: i64,
    pub notes: String,
    pub timestamp: NaiveDateTime,
}

/// The user-editable part of an entry, collected before each create or edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFields {
    pub name: String,
    pub task: String,
    pub minutes: i64,
    pub notes: String,
}

impl EntryFields {
    pub fn new(name: impl Into<String>, task: impl Into<String>, minutes: i64, notes: impl Into<String>) -> Self {
        EntryFields {
            name: name.into(),
            task: task.into(),
            minutes,
            notes: notes.into(),
        }
    }

    /// Name and task must never be stored empty.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.is_empty() {
            return Err(StoreError::Invalid("name cannot be empty".to_string()));
        }
        if self.task.is_empty() {
            return Err(StoreError::Invalid("task cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Entry {
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            name: self.name.clone(),
            task: self.task.clone(),
            minutes: self.minutes,
            notes: self.notes.clone(),
        }
    }

    pub fn apply(&mut self, fields: EntryFields) {
        self.name = fields.name;
        self.task = fields.task;
        self.minutes = fields.minutes;
        self.notes = fields.notes;
    }

    pub fn long_date(&self) -> String {
        self.timestamp.format(LONG_DATE_FORMAT).to_string()
    }
}
