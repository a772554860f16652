// src/input.rs
//! Prompt-and-validate helpers. Invalid input never escapes as an error:
//! each helper re-prompts until it gets something usable. Only terminal
//! failures (including closed input) are returned.
use crate::console::Console;
use crate::error::ConsoleResult;
use crate::models::DATE_INPUT_FORMAT;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{BufRead, Write};

pub const INTEGER_REQUIRED_MSG: &str = "Please enter an integer.";
pub const DATE_FORMAT_MSG: &str = "Must be in YYYY-mm-dd format!";

/// Prompts until a non-empty line is entered and returns it unchanged.
pub fn take_required_string<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    prompt: &str,
) -> ConsoleResult<String> {
    loop {
        let value = console.prompt(prompt)?;
        if !value.is_empty() {
            return Ok(value);
        }
        console.clear()?;
    }
}

pub fn take_optional_string<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    prompt: &str,
) -> ConsoleResult<String> {
    console.prompt(prompt)
}

/// Prompts until the input parses as an integer. No lower bound is enforced.
pub fn take_minutes<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    prompt: &str,
) -> ConsoleResult<i64> {
    loop {
        let raw = console.prompt(prompt)?;
        match raw.trim().parse::<i64>() {
            Ok(minutes) => return Ok(minutes),
            Err(e) => {
                log::debug!("Rejected minutes input {:?}: {}", raw, e);
                console.say(INTEGER_REQUIRED_MSG)?;
            }
        }
    }
}

/// Prompts until a `YYYY-MM-DD` date is entered; the result is at midnight.
pub fn take_date<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    prompt: &str,
) -> ConsoleResult<NaiveDateTime> {
    loop {
        let raw = console.prompt(prompt)?;
        match parse_date(&raw) {
            Some(date) => return Ok(date.and_time(chrono::NaiveTime::MIN)),
            None => console.say(DATE_FORMAT_MSG)?,
        }
    }
}

/// Strict `YYYY-MM-DD`: chrono alone would also accept unpadded fields like `2024-3-5`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT).ok()
}
