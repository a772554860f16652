// src/store.rs
use crate::error::{StoreError, StoreResult};
use crate::models::{Entry, EntryFields, DATE_INPUT_FORMAT};
use crate::search::SearchFilter;
use chrono::{Local, NaiveDate, NaiveDateTime};
use log;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::time::Duration;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT    NOT NULL CHECK (length(name) > 0),
    task      TEXT    NOT NULL CHECK (length(task) > 0),
    minutes   INTEGER NOT NULL,
    notes     TEXT    NOT NULL DEFAULT '',
    timestamp TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries (timestamp);
";

const ENTRY_SELECT_SQL: &str = "SELECT id, name, task, minutes, notes, timestamp FROM entries";

/// Every result set is newest first; ties fall back to insertion order.
const ENTRY_ORDER_SQL: &str = "ORDER BY timestamp DESC, id DESC";

/// SQLite-backed store owning the single connection used by the application.
pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        log::info!("Opening entry store at {:?}", path);
        let conn = Connection::open(path).map_err(|e| {
            log::error!("Failed to open database {:?}: {}", path, e);
            StoreError::Sqlite(e)
        })?;
        Self::bootstrap(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        log::debug!("Opening in-memory entry store");
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA_SQL).map_err(|e| {
            log::error!("Failed to create schema: {}", e);
            StoreError::Sqlite(e)
        })?;
        Ok(EntryStore { conn })
    }

    /// Releases the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| {
            log::error!("Failed to close entry store: {}", e);
            StoreError::Sqlite(e)
        })?;
        log::info!("Entry store closed");
        Ok(())
    }

    /// Creates an entry stamped with the current local time.
    pub fn create(&self, fields: &EntryFields) -> StoreResult<Entry> {
        self.create_at(fields, Local::now().naive_local())
    }

    pub fn create_at(&self, fields: &EntryFields, timestamp: NaiveDateTime) -> StoreResult<Entry> {
        fields.validate()?;
        self.conn.execute(
            "INSERT INTO entries (name, task, minutes, notes, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![fields.name, fields.task, fields.minutes, fields.notes, timestamp],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Created entry {} for '{}' ({} minutes)", id, fields.name, fields.minutes);
        Ok(Entry {
            id,
            name: fields.name.clone(),
            task: fields.task.clone(),
            minutes: fields.minutes,
            notes: fields.notes.clone(),
            timestamp,
        })
    }

    #[cfg(test)]
    pub fn get(&self, id: i64) -> StoreResult<Option<Entry>> {
        let mut stmt = self.conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_entry_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn select_all(&self) -> StoreResult<Vec<Entry>> {
        self.filter(&SearchFilter::All)
    }

    /// Runs the filter's predicate in SQL and returns matches newest first.
    pub fn filter(&self, filter: &SearchFilter) -> StoreResult<Vec<Entry>> {
        let (clause, values) = filter.where_clause();
        let sql = format!("{ENTRY_SELECT_SQL} WHERE {clause} {ENTRY_ORDER_SQL}");
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(values), parse_entry_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Filter {:?} matched {} entries", filter, entries.len());
        Ok(entries)
    }

    pub fn update(&self, entry: &Entry) -> StoreResult<()> {
        entry.fields().validate()?;
        let changed = self.conn.execute(
            "UPDATE entries SET name = ?1, task = ?2, minutes = ?3, notes = ?4, timestamp = ?5 WHERE id = ?6",
            params![entry.name, entry.task, entry.minutes, entry.notes, entry.timestamp, entry.id],
        )?;
        if changed == 0 {
            log::warn!("Update skipped: entry {} no longer exists", entry.id);
            return Err(StoreError::NotFound(entry.id));
        }
        log::info!("Updated entry {}", entry.id);
        Ok(())
    }

    pub fn delete(&self, entry: &Entry) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![entry.id])?;
        if changed == 0 {
            log::warn!("Delete skipped: entry {} no longer exists", entry.id);
            return Err(StoreError::NotFound(entry.id));
        }
        log::info!("Deleted entry {}", entry.id);
        Ok(())
    }

    /// Distinct employee names among the entries matching `filter`, sorted.
    pub fn distinct_names(&self, filter: &SearchFilter) -> StoreResult<Vec<String>> {
        let (clause, values) = filter.where_clause();
        let sql = format!("SELECT DISTINCT name FROM entries WHERE {clause} ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map(params_from_iter(values), |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn distinct_minutes(&self) -> StoreResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT minutes FROM entries ORDER BY minutes")?;
        let minutes = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(minutes)
    }

    /// Days that have at least one entry, newest first.
    pub fn distinct_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(timestamp, 1, 10) AS day FROM entries ORDER BY day DESC",
        )?;
        let days = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        days.iter()
            .map(|day| {
                NaiveDate::parse_from_str(day, DATE_INPUT_FORMAT).map_err(|e| {
                    log::error!("Stored timestamp has an unreadable date '{}': {}", day, e);
                    StoreError::Invalid(format!("bad stored date '{}': {}", day, e))
                })
            })
            .collect()
    }

    pub fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn parse_entry_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        name: row.get(1)?,
        task: row.get(2)?,
        minutes: row.get(3)?,
        notes: row.get(4)?,
        timestamp: row.get(5)?,
    })
}
