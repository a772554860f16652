// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input stream closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entry {0} not found")]
    NotFound(i64),
    #[error("Invalid entry: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CLI error: {0}")]
    Cli(String),
}

impl AppError {
    /// True when the user closed the input stream; the session just ends.
    pub fn is_input_closed(&self) -> bool {
        matches!(self, AppError::Console(ConsoleError::Closed))
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ConsoleResult<T> = Result<T, ConsoleError>;
