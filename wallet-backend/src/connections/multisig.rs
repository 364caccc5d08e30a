//! Multi-sig group linkage.
//!
//! A scanned OOBI carrying a `groupId` is ambiguous: it may be the first
//! scan on this device (the caller must start local group identifier
//! creation) or a join of a group another device already initiated. The
//! classification is derived from whether a local identifier exists for
//! the group and whether its group has been created yet.

use serde::{Deserialize, Serialize};

use super::error::extract_duplicate_id;
use super::{invitation, ConnectionError, ConnectionService};
use crate::models::ConnectionShortDetails;

/// Classification of an OOBI scan the caller must act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum OobiConnection {
    /// An ordinary peer connection; nothing further to drive.
    Normal,
    /// First scan for this group on this device; the caller drives local
    /// group identifier creation.
    MultiSigInitiator { group_id: String },
    /// The group exists locally but is not created yet; the caller routes
    /// into the pending-group join flow.
    MultiSigMember { group_id: String },
}

impl ConnectionService {
    /// Resolve an OOBI URL and classify the resulting connection.
    ///
    /// Fails with `DuplicateConnection` (carrying the existing id) when the
    /// agent reports the invitation was already resolved.
    pub async fn connect_by_oobi(&self, url: &str) -> Result<OobiConnection, ConnectionError> {
        let group_id = invitation::extract_group_id(url);

        let mut record = match self.agent().resolve_oobi(url, self.policy()).await {
            Ok(record) => record,
            Err(e) => {
                if let Some(connection_id) = extract_duplicate_id(&e.message) {
                    return Err(ConnectionError::DuplicateConnection { connection_id });
                }
                return Err(e.into());
            }
        };

        let group_id = match group_id {
            None => {
                self.db().save_connection(&record)?;
                self.publish_state_change(&record);
                return Ok(OobiConnection::Normal);
            }
            Some(group_id) => group_id,
        };

        record.group_id = Some(group_id.clone());
        self.db().save_connection(&record)?;
        self.publish_state_change(&record);

        let identifier = self.db().get_identifier_by_group(&group_id)?;
        match identifier {
            // First scan for this group on this device
            None => {
                log::info!("First scan for group {}; caller initiates", group_id);
                Ok(OobiConnection::MultiSigInitiator { group_id })
            }
            Some(identifier) => {
                let group_created = identifier
                    .group_metadata
                    .map(|m| m.group_created)
                    .unwrap_or(false);
                if group_created {
                    // The group identifier already exists; nothing to drive
                    Ok(OobiConnection::Normal)
                } else {
                    log::info!("Joining pending group {}", group_id);
                    Ok(OobiConnection::MultiSigMember { group_id })
                }
            }
        }
    }

    /// Connections tagged with a multi-sig group, in insertion order.
    pub fn get_multisig_linked_contacts(
        &self,
        group_id: &str,
    ) -> Result<Vec<ConnectionShortDetails>, ConnectionError> {
        let records = self.db().get_connections_by_group(group_id)?;
        Ok(records.iter().map(ConnectionShortDetails::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_wire_shape() {
        let normal = serde_json::to_value(OobiConnection::Normal).unwrap();
        assert_eq!(normal, serde_json::json!({ "type": "NORMAL" }));

        let initiator = serde_json::to_value(OobiConnection::MultiSigInitiator {
            group_id: "123".to_string(),
        })
        .unwrap();
        assert_eq!(
            initiator,
            serde_json::json!({ "type": "MULTI_SIG_INITIATOR", "groupId": "123" })
        );

        let member = serde_json::to_value(OobiConnection::MultiSigMember {
            group_id: "123".to_string(),
        })
        .unwrap();
        assert_eq!(
            member,
            serde_json::json!({ "type": "MULTI_SIG_MEMBER", "groupId": "123" })
        );
    }
}
