//! Connection record database operations

use rusqlite::{Result as SqliteResult, Row};

use super::super::{parse_enum, parse_timestamp, Database};
use crate::models::{ConnectionRecord, ConnectionState};

const CONNECTION_COLUMNS: &str =
    "id, label, logo, oobi, state, role, auto_accept_connection, out_of_band_id, group_id, created_at";

fn map_connection_row(row: &Row<'_>) -> SqliteResult<ConnectionRecord> {
    let state: String = row.get(4)?;
    let role: String = row.get(5)?;
    let created_at: String = row.get(9)?;
    Ok(ConnectionRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        logo: row.get(2)?,
        oobi: row.get(3)?,
        state: parse_enum(4, state)?,
        role: parse_enum(5, role)?,
        auto_accept_connection: row.get(6)?,
        out_of_band_id: row.get(7)?,
        group_id: row.get(8)?,
        created_at: parse_timestamp(9, created_at)?,
    })
}

impl Database {
    /// Insert a connection record. An existing record with the same id is
    /// left untouched (created_at is immutable once set).
    pub fn save_connection(&self, record: &ConnectionRecord) -> SqliteResult<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO connections
                (id, label, logo, oobi, state, role, auto_accept_connection,
                 out_of_band_id, group_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO NOTHING",
            rusqlite::params![
                record.id,
                record.label,
                record.logo,
                record.oobi,
                record.state.as_ref(),
                record.role.as_ref(),
                record.auto_accept_connection,
                record.out_of_band_id,
                record.group_id,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a single connection record by id.
    pub fn get_connection(&self, id: &str) -> SqliteResult<Option<ConnectionRecord>> {
        let conn = self.conn();
        let result = conn.query_row(
            &format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1"),
            [id],
            map_connection_row,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List all connection records in insertion order.
    pub fn get_all_connections(&self) -> SqliteResult<Vec<ConnectionRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections ORDER BY rowid"
        ))?;
        let records = stmt
            .query_map([], map_connection_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(records)
    }

    /// List connection records tagged with a multi-sig group, in insertion order.
    pub fn get_connections_by_group(&self, group_id: &str) -> SqliteResult<Vec<ConnectionRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections WHERE group_id = ?1 ORDER BY rowid"
        ))?;
        let records = stmt
            .query_map([group_id], map_connection_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(records)
    }

    /// Update a connection's lifecycle state. Returns true if a row changed.
    pub fn update_connection_state(
        &self,
        id: &str,
        state: ConnectionState,
    ) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute(
            "UPDATE connections SET state = ?2 WHERE id = ?1",
            rusqlite::params![id, state.as_ref()],
        )?;
        Ok(rows > 0)
    }

    /// Delete a connection record by id. Returns true if a row was deleted.
    pub fn delete_connection(&self, id: &str) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute("DELETE FROM connections WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::{ConnectionRole, ConnectionState};

    use super::*;

    fn record(id: &str, group_id: Option<&str>) -> ConnectionRecord {
        ConnectionRecord {
            id: id.to_string(),
            created_at: Utc::now(),
            label: Some(format!("{id}-label")),
            logo: None,
            oobi: None,
            state: ConnectionState::Completed,
            role: ConnectionRole::Requester,
            auto_accept_connection: false,
            out_of_band_id: None,
            group_id: group_id.map(|g| g.to_string()),
        }
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let db = Database::new(":memory:").unwrap();
        let rec = record("c1", None);
        db.save_connection(&rec).unwrap();

        let loaded = db.get_connection("c1").unwrap().unwrap();
        assert_eq!(loaded.id, "c1");
        assert_eq!(loaded.label.as_deref(), Some("c1-label"));
        assert_eq!(loaded.state, ConnectionState::Completed);
        assert_eq!(loaded.role, ConnectionRole::Requester);
        assert!(db.get_connection("missing").unwrap().is_none());
    }

    #[test]
    fn test_save_is_idempotent_and_keeps_created_at() {
        let db = Database::new(":memory:").unwrap();
        let rec = record("c1", None);
        db.save_connection(&rec).unwrap();

        let mut replay = record("c1", None);
        replay.label = Some("changed".to_string());
        db.save_connection(&replay).unwrap();

        let all = db.get_all_connections().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].label.as_deref(), Some("c1-label"));
        assert_eq!(all[0].created_at, rec.created_at);
    }

    #[test]
    fn test_group_filter_and_insertion_order() {
        let db = Database::new(":memory:").unwrap();
        db.save_connection(&record("a", Some("g1"))).unwrap();
        db.save_connection(&record("b", None)).unwrap();
        db.save_connection(&record("c", Some("g1"))).unwrap();

        let grouped = db.get_connections_by_group("g1").unwrap();
        assert_eq!(
            grouped.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(db.get_connections_by_group("g2").unwrap().is_empty());
    }

    #[test]
    fn test_update_state_and_delete() {
        let db = Database::new(":memory:").unwrap();
        let mut rec = record("c1", None);
        rec.state = ConnectionState::RequestSent;
        db.save_connection(&rec).unwrap();

        assert!(db
            .update_connection_state("c1", ConnectionState::Completed)
            .unwrap());
        assert_eq!(
            db.get_connection("c1").unwrap().unwrap().state,
            ConnectionState::Completed
        );

        assert!(db.delete_connection("c1").unwrap());
        assert!(!db.delete_connection("c1").unwrap());
    }

    #[test]
    fn test_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.db");
        let url = path.to_string_lossy().to_string();

        {
            let db = Database::new(&url).unwrap();
            db.save_connection(&record("c1", None)).unwrap();
        }
        let db = Database::new(&url).unwrap();
        assert!(db.get_connection("c1").unwrap().is_some());
    }
}
