//! Identifier database operations (read-side of the identifier lifecycle)
//!
//! The connection engine only reads these rows to classify group OOBIs;
//! creation and key management belong to the identifier service.

use rusqlite::{Result as SqliteResult, Row};

use super::super::{parse_timestamp, Database};
use crate::models::{GroupMetadata, IdentifierRecord};

fn map_identifier_row(row: &Row<'_>) -> SqliteResult<IdentifierRecord> {
    let created_at: String = row.get(5)?;
    let group_id: Option<String> = row.get(2)?;
    Ok(IdentifierRecord {
        id: row.get(0)?,
        display_name: row.get(1)?,
        group_metadata: group_id.map(|group_id| {
            Ok::<_, rusqlite::Error>(GroupMetadata {
                group_id,
                group_initiator: row.get(3)?,
                group_created: row.get(4)?,
            })
        })
        .transpose()?,
        created_at: parse_timestamp(5, created_at)?,
    })
}

impl Database {
    /// Insert or update an identifier record.
    pub fn save_identifier(&self, record: &IdentifierRecord) -> SqliteResult<()> {
        let conn = self.conn();
        let (group_id, group_initiator, group_created) = match &record.group_metadata {
            Some(meta) => (Some(meta.group_id.as_str()), meta.group_initiator, meta.group_created),
            None => (None, false, false),
        };
        conn.execute(
            "INSERT INTO identifiers (id, display_name, group_id, group_initiator, group_created, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                display_name = excluded.display_name,
                group_id = excluded.group_id,
                group_initiator = excluded.group_initiator,
                group_created = excluded.group_created",
            rusqlite::params![
                record.id,
                record.display_name,
                group_id,
                group_initiator,
                group_created,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find the local identifier created for a multi-sig group, if any.
    pub fn get_identifier_by_group(
        &self,
        group_id: &str,
    ) -> SqliteResult<Option<IdentifierRecord>> {
        let conn = self.conn();
        let result = conn.query_row(
            "SELECT id, display_name, group_id, group_initiator, group_created, created_at
             FROM identifiers WHERE group_id = ?1",
            [group_id],
            map_identifier_row,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_group_lookup() {
        let db = Database::new(":memory:").unwrap();
        db.save_identifier(&IdentifierRecord {
            id: "aid1".to_string(),
            display_name: "Group member".to_string(),
            created_at: Utc::now(),
            group_metadata: Some(GroupMetadata {
                group_id: "g1".to_string(),
                group_initiator: true,
                group_created: false,
            }),
        })
        .unwrap();

        let found = db.get_identifier_by_group("g1").unwrap().unwrap();
        let meta = found.group_metadata.unwrap();
        assert!(meta.group_initiator);
        assert!(!meta.group_created);
        assert!(db.get_identifier_by_group("g2").unwrap().is_none());
    }

    #[test]
    fn test_upsert_marks_group_created() {
        let db = Database::new(":memory:").unwrap();
        let mut record = IdentifierRecord {
            id: "aid1".to_string(),
            display_name: "Group member".to_string(),
            created_at: Utc::now(),
            group_metadata: Some(GroupMetadata {
                group_id: "g1".to_string(),
                group_initiator: false,
                group_created: false,
            }),
        };
        db.save_identifier(&record).unwrap();

        record.group_metadata = Some(GroupMetadata {
            group_id: "g1".to_string(),
            group_initiator: false,
            group_created: true,
        });
        db.save_identifier(&record).unwrap();

        let found = db.get_identifier_by_group("g1").unwrap().unwrap();
        assert!(found.group_metadata.unwrap().group_created);
    }
}
