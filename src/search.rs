// src/search.rs
use crate::browse::browse;
use crate::console::Console;
use crate::error::{AppResult, ConsoleResult};
use crate::input::{take_date, take_minutes, take_required_string};
#[cfg(test)]
use crate::models::Entry;
use crate::models::DATE_INPUT_FORMAT;
use crate::store::EntryStore;
use chrono::NaiveDate;
use rusqlite::types::Value;
use std::io::{BufRead, Write};

pub const NAME_REQUIRED_MSG: &str = "Please enter Name to search";

/// Which entries a browse session shows. Text matching is ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    All,
    /// Task or notes contain the term.
    Term(String),
    /// Name contains the term.
    Employee(String),
    Minutes(i64),
    /// Entries logged on this day.
    Date(NaiveDate),
    /// Entries logged between the two days, both ends included.
    Range(NaiveDate, NaiveDate),
}

impl SearchFilter {
    /// Builds a range filter, swapping the ends if they arrive reversed.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            SearchFilter::Range(start, end)
        } else {
            SearchFilter::Range(end, start)
        }
    }

    /// SQL predicate over the `entries` table plus its positional parameters.
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        match self {
            SearchFilter::All => ("1 = 1".to_string(), Vec::new()),
            SearchFilter::Term(term) => (
                "(instr(lower(task), lower(?)) > 0 OR instr(lower(notes), lower(?)) > 0)".to_string(),
                vec![Value::Text(term.clone()), Value::Text(term.clone())],
            ),
            SearchFilter::Employee(name) => (
                "instr(lower(name), lower(?)) > 0".to_string(),
                vec![Value::Text(name.clone())],
            ),
            SearchFilter::Minutes(minutes) => ("minutes = ?".to_string(), vec![Value::Integer(*minutes)]),
            SearchFilter::Date(day) => ("substr(timestamp, 1, 10) = ?".to_string(), vec![day_value(day)]),
            SearchFilter::Range(start, end) => (
                "substr(timestamp, 1, 10) BETWEEN ? AND ?".to_string(),
                vec![day_value(start), day_value(end)],
            ),
        }
    }

    /// In-memory form of the same predicate `where_clause` compiles to SQL,
    /// used to cross-check the generated queries.
    #[cfg(test)]
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Term(term) => contains_ignore_case(&entry.task, term) || contains_ignore_case(&entry.notes, term),
            SearchFilter::Employee(name) => contains_ignore_case(&entry.name, name),
            SearchFilter::Minutes(minutes) => entry.minutes == *minutes,
            SearchFilter::Date(day) => entry.timestamp.date() == *day,
            SearchFilter::Range(start, end) => (*start..=*end).contains(&entry.timestamp.date()),
        }
    }
}

fn day_value(day: &NaiveDate) -> Value {
    Value::Text(day.format(DATE_INPUT_FORMAT).to_string())
}

#[cfg(test)]
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

pub fn search_term<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let term = take_required_string(console, "Enter a search term: ")?;
    browse(console, store, &SearchFilter::Term(term))
}

pub fn search_employee<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let name = prompt_employee_name(console)?;
    let name = refine_employee_search(console, store, name)?;
    browse(console, store, &SearchFilter::Employee(name))
}

fn prompt_employee_name<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ConsoleResult<String> {
    loop {
        let name = console.prompt("Enter employee name: ")?;
        if !name.is_empty() {
            return Ok(name);
        }
        console.say(NAME_REQUIRED_MSG)?;
    }
}

/// When the name matches several employees, lets the user see them and narrow it down.
fn refine_employee_search<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &EntryStore,
    name: String,
) -> AppResult<String> {
    let names = store.distinct_names(&SearchFilter::Employee(name.clone()))?;
    if names.len() <= 1 {
        return Ok(name);
    }

    console.say(&format!("{} employees match '{}'.", names.len(), name))?;
    console.say("m) View matching names and refine the search")?;
    console.say("Press enter to view entries for all of them")?;
    let choice = console.prompt("Action: ")?;
    if !choice.trim().eq_ignore_ascii_case("m") {
        return Ok(name);
    }

    console.clear()?;
    for candidate in &names {
        console.say(candidate)?;
    }
    Ok(prompt_employee_name(console)?)
}

pub fn search_minutes<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let recorded: Vec<String> = store.distinct_minutes()?.iter().map(i64::to_string).collect();
    console.say(&format!("Minutes recorded: {}", recorded.join(", ")))?;
    let minutes = take_minutes(console, "Enter minutes to search: ")?;
    browse(console, store, &SearchFilter::Minutes(minutes))
}

pub fn search_date<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let days: Vec<String> = store
        .distinct_dates()?
        .iter()
        .map(|day| day.format(DATE_INPUT_FORMAT).to_string())
        .collect();
    console.say(&format!("Dates with entries: {}", days.join(", ")))?;
    let day = take_date(console, "Enter a date (YYYY-MM-DD): ")?;
    browse(console, store, &SearchFilter::Date(day.date()))
}

pub fn search_range<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &EntryStore) -> AppResult<()> {
    let start = take_date(console, "Start date (YYYY-MM-DD): ")?;
    let end = take_date(console, "End date (YYYY-MM-DD): ")?;
    browse(console, store, &SearchFilter::range(start.date(), end.date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::{exhausted, scripted, transcript};
    use crate::input::INTEGER_REQUIRED_MSG;
    use crate::models::EntryFields;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    /// A: alice/build/30 on the 4th, B: bob/test/45 on the 5th (newest).
    fn seeded_store() -> (EntryStore, Entry, Entry) {
        let store = EntryStore::open_in_memory().unwrap();
        let a = store
            .create_at(&EntryFields::new("alice", "build", 30, "compile the Kernel"), day(4).and_hms_opt(9, 0, 0).unwrap())
            .unwrap();
        let b = store
            .create_at(&EntryFields::new("bob", "test", 45, ""), day(5).and_hms_opt(23, 59, 59).unwrap())
            .unwrap();
        (store, a, b)
    }

    fn assert_sql_matches_memory(store: &EntryStore, filter: &SearchFilter) {
        let expected: Vec<Entry> = store
            .select_all()
            .unwrap()
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        assert_eq!(store.filter(filter).unwrap(), expected, "filter {:?}", filter);
    }

    #[test]
    fn test_term_matches_task_only_entry() {
        let (store, a, _) = seeded_store();
        assert_eq!(store.filter(&SearchFilter::Term("build".to_string())).unwrap(), vec![a.clone()]);
        assert_eq!(store.filter(&SearchFilter::Term("BUILD".to_string())).unwrap(), vec![a.clone()]);
        assert_eq!(store.filter(&SearchFilter::Term("kernel".to_string())).unwrap(), vec![a]);
    }

    #[test]
    fn test_term_treats_like_wildcards_literally() {
        let (store, _, _) = seeded_store();
        assert!(store.filter(&SearchFilter::Term("%".to_string())).unwrap().is_empty());
        assert!(store.filter(&SearchFilter::Term("_".to_string())).unwrap().is_empty());
    }

    #[test]
    fn test_minutes_matches_exact_value() {
        let (store, _, b) = seeded_store();
        assert_eq!(store.filter(&SearchFilter::Minutes(45)).unwrap(), vec![b]);
        assert!(store.filter(&SearchFilter::Minutes(44)).unwrap().is_empty());
    }

    #[test]
    fn test_date_and_range_match_whole_days() {
        let (store, a, b) = seeded_store();
        assert_eq!(store.filter(&SearchFilter::Date(day(5))).unwrap(), vec![b.clone()]);
        assert_eq!(store.filter(&SearchFilter::range(day(4), day(5))).unwrap(), vec![b.clone(), a.clone()]);
        assert_eq!(store.filter(&SearchFilter::range(day(5), day(5))).unwrap(), vec![b]);
        assert_eq!(store.filter(&SearchFilter::range(day(4), day(1))).unwrap(), vec![a]);
        assert!(store.filter(&SearchFilter::Date(day(6))).unwrap().is_empty());
    }

    #[test]
    fn test_range_normalises_reversed_ends() {
        assert_eq!(SearchFilter::range(day(9), day(2)), SearchFilter::Range(day(2), day(9)));
    }

    #[test]
    fn test_sql_and_memory_predicates_agree() {
        let (store, _, _) = seeded_store();
        store
            .create_at(&EntryFields::new("Alicia", "write docs", 45, "build notes"), day(3).and_hms_opt(12, 0, 0).unwrap())
            .unwrap();
        for filter in [
            SearchFilter::All,
            SearchFilter::Term("build".to_string()),
            SearchFilter::Employee("ali".to_string()),
            SearchFilter::Minutes(45),
            SearchFilter::Date(day(4)),
            SearchFilter::range(day(3), day(4)),
        ] {
            assert_sql_matches_memory(&store, &filter);
        }
    }

    #[test]
    fn test_search_term_flow_browses_matches() {
        let (store, _, _) = seeded_store();
        let mut console = scripted(&["build", "q"]);
        search_term(&mut console, &store).unwrap();
        let out = transcript(&console);
        assert!(out.contains("Name: alice"));
        assert!(!out.contains("Name: bob"));
    }

    #[test]
    fn test_search_employee_single_match_skips_refinement() {
        let (store, _, _) = seeded_store();
        let mut console = scripted(&["bob", "q"]);
        search_employee(&mut console, &store).unwrap();
        let out = transcript(&console);
        assert!(!out.contains("employees match"));
        assert!(out.contains("Name: bob"));
        assert!(exhausted(&console));
    }

    #[test]
    fn test_search_employee_refines_between_similar_names() {
        let (store, _, _) = seeded_store();
        store
            .create_at(&EntryFields::new("alicia", "deploy", 15, ""), day(2).and_hms_opt(8, 0, 0).unwrap())
            .unwrap();
        let mut console = scripted(&["", "ali", "m", "", "alicia", "q"]);
        search_employee(&mut console, &store).unwrap();
        let out = transcript(&console);
        assert_eq!(out.matches(NAME_REQUIRED_MSG).count(), 2);
        assert!(out.contains("2 employees match 'ali'."));
        assert!(out.contains("alice\nalicia\n"));
        assert!(out.contains("Name: alicia"));
        assert!(!out.contains("Name: alice\n"));
        assert!(exhausted(&console));
    }

    #[test]
    fn test_search_employee_keeps_broad_term_without_refinement() {
        let (store, _, _) = seeded_store();
        store
            .create_at(&EntryFields::new("alicia", "deploy", 15, ""), day(2).and_hms_opt(8, 0, 0).unwrap())
            .unwrap();
        let mut console = scripted(&["ali", "", "q"]);
        search_employee(&mut console, &store).unwrap();
        assert!(transcript(&console).contains("Page 1 of 2"));
    }

    #[test]
    fn test_search_minutes_lists_values_and_reprompts() {
        let (store, _, _) = seeded_store();
        let mut console = scripted(&["string", "45", "q"]);
        search_minutes(&mut console, &store).unwrap();
        let out = transcript(&console);
        assert!(out.contains("Minutes recorded: 30, 45"));
        assert!(out.contains(INTEGER_REQUIRED_MSG));
        assert!(out.contains("Name: bob"));
        assert!(!out.contains("Name: alice"));
    }

    #[test]
    fn test_search_date_flow() {
        let (store, _, _) = seeded_store();
        let mut console = scripted(&["2024-03-04", "q"]);
        search_date(&mut console, &store).unwrap();
        let out = transcript(&console);
        assert!(out.contains("Dates with entries: 2024-03-05, 2024-03-04"));
        assert!(out.contains("Name: alice"));
    }

    #[test]
    fn test_search_range_flow_with_no_matches() {
        let (store, _, _) = seeded_store();
        let mut console = scripted(&["1234-12-12", "1234-12-12", ""]);
        search_range(&mut console, &store).unwrap();
        assert!(transcript(&console).contains("No Results"));
        assert!(exhausted(&console));
    }
}
