//! Connection note database operations

use chrono::Utc;
use rusqlite::{Result as SqliteResult, Row};
use uuid::Uuid;

use super::super::{parse_timestamp, Database};
use crate::models::{ConnectionNote, NoteContent};

const NOTE_COLUMNS: &str = "id, connection_id, title, message, created_at, updated_at";

fn map_note_row(row: &Row<'_>) -> SqliteResult<ConnectionNote> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(ConnectionNote {
        id: row.get(0)?,
        connection_id: row.get(1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        created_at: parse_timestamp(4, created_at)?,
        updated_at: parse_timestamp(5, updated_at)?,
    })
}

impl Database {
    /// Create a note for a connection. Returns the created note.
    pub fn create_note(
        &self,
        connection_id: &str,
        content: &NoteContent,
    ) -> SqliteResult<ConnectionNote> {
        let conn = self.conn();
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO connection_notes (id, connection_id, title, message, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![id, connection_id, content.title, content.message, now.to_rfc3339()],
        )?;
        Ok(ConnectionNote {
            id,
            connection_id: connection_id.to_string(),
            title: content.title.clone(),
            message: content.message.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a single note by id.
    pub fn get_note(&self, id: &str) -> SqliteResult<Option<ConnectionNote>> {
        let conn = self.conn();
        let result = conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM connection_notes WHERE id = ?1"),
            [id],
            map_note_row,
        );
        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List all notes attached to a connection, oldest first.
    pub fn get_notes_by_connection(&self, connection_id: &str) -> SqliteResult<Vec<ConnectionNote>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM connection_notes WHERE connection_id = ?1 ORDER BY rowid"
        ))?;
        let notes = stmt
            .query_map([connection_id], map_note_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(notes)
    }

    /// Find the oldest note attached to a connection, if any.
    pub fn find_note_by_connection(
        &self,
        connection_id: &str,
    ) -> SqliteResult<Option<ConnectionNote>> {
        let conn = self.conn();
        let result = conn.query_row(
            &format!(
                "SELECT {NOTE_COLUMNS} FROM connection_notes
                 WHERE connection_id = ?1 ORDER BY rowid LIMIT 1"
            ),
            [connection_id],
            map_note_row,
        );
        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace a note's content. Returns true if a row changed.
    pub fn update_note(&self, id: &str, content: &NoteContent) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute(
            "UPDATE connection_notes SET title = ?2, message = ?3, updated_at = ?4 WHERE id = ?1",
            rusqlite::params![id, content.title, content.message, Utc::now().to_rfc3339()],
        )?;
        Ok(rows > 0)
    }

    /// Delete a note by id. Returns true if a row was deleted.
    pub fn delete_note(&self, id: &str) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute("DELETE FROM connection_notes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(title: &str, message: &str) -> NoteContent {
        NoteContent {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_create_and_list_in_insertion_order() {
        let db = Database::new(":memory:").unwrap();
        let first = db.create_note("conn1", &content("first", "a")).unwrap();
        let second = db.create_note("conn1", &content("second", "b")).unwrap();
        db.create_note("conn2", &content("other", "c")).unwrap();

        let notes = db.get_notes_by_connection("conn1").unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, first.id);
        assert_eq!(notes[1].id, second.id);

        let oldest = db.find_note_by_connection("conn1").unwrap().unwrap();
        assert_eq!(oldest.id, first.id);
        assert!(db.find_note_by_connection("conn3").unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete() {
        let db = Database::new(":memory:").unwrap();
        let note = db.create_note("conn1", &content("title", "message")).unwrap();

        assert!(db.update_note(&note.id, &content("title", "message2")).unwrap());
        let loaded = db.get_note(&note.id).unwrap().unwrap();
        assert_eq!(loaded.message, "message2");
        assert!(loaded.updated_at >= loaded.created_at);

        assert!(db.delete_note(&note.id).unwrap());
        // Idempotent: deleting again is not an error
        assert!(!db.delete_note(&note.id).unwrap());
        assert!(db.get_note(&note.id).unwrap().is_none());
    }
}
