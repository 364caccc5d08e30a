use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form annotation attached to a connection. Notes live independently
/// of the connection record and are cascade-deleted with it at the
/// application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionNote {
    pub id: String,
    pub connection_id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or updating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteContent {
    pub title: String,
    pub message: String,
}
