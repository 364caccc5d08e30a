//! Note operations.
//!
//! Notes are annotations the user keeps on a connection; they are created
//! and deleted independently of the record, and removed in bulk when the
//! connection itself is deleted (see `delete_connection`).

use super::{ConnectionError, ConnectionService};
use crate::models::NoteContent;

impl ConnectionService {
    /// Attach a note to a connection. Returns the fresh note id.
    pub fn create_note(
        &self,
        connection_id: &str,
        content: &NoteContent,
    ) -> Result<String, ConnectionError> {
        let note = self.db().create_note(connection_id, content)?;
        Ok(note.id)
    }

    /// Update the note attached to a connection. When several notes exist
    /// the oldest one is addressed.
    pub fn update_note(
        &self,
        connection_id: &str,
        content: &NoteContent,
    ) -> Result<(), ConnectionError> {
        let note = self
            .db()
            .find_note_by_connection(connection_id)?
            .ok_or_else(|| ConnectionError::NoteNotFound {
                connection_id: connection_id.to_string(),
            })?;
        self.db().update_note(&note.id, content)?;
        Ok(())
    }

    /// Delete a note by id. Deleting an absent note is not an error.
    pub fn delete_note(&self, note_id: &str) -> Result<(), ConnectionError> {
        self.db().delete_note(note_id)?;
        Ok(())
    }
}
