//! SQLite persistence for connection records, notes, and identifiers.
//!
//! `Database` owns a single connection behind a mutex; table-group methods
//! live in `impl Database` blocks under `tables/`.

mod tables;

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result as SqliteResult};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn();

        // Connection records synced with the remote agent
        conn.execute(
            "CREATE TABLE IF NOT EXISTS connections (
                id TEXT PRIMARY KEY,
                label TEXT,
                logo TEXT,
                oobi TEXT,
                state TEXT NOT NULL,
                role TEXT NOT NULL,
                auto_accept_connection INTEGER NOT NULL DEFAULT 0,
                out_of_band_id TEXT,
                group_id TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        // Free-form notes attached to connections (cascade is application-managed)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS connection_notes (
                id TEXT PRIMARY KEY,
                connection_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_connection_notes_connection
             ON connection_notes(connection_id)",
            [],
        )?;

        // Local identifiers; written by the identifier lifecycle, read here
        // to classify group OOBIs
        conn.execute(
            "CREATE TABLE IF NOT EXISTS identifiers (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                group_id TEXT,
                group_initiator INTEGER NOT NULL DEFAULT 0,
                group_created INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

/// Parse an RFC 3339 column value into a UTC timestamp.
pub(crate) fn parse_timestamp(idx: usize, value: String) -> SqliteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a snake_case enum column value.
pub(crate) fn parse_enum<T>(idx: usize, value: String) -> SqliteResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
