//! Reconciliation of local connection records against the remote agent's
//! contact list.
//!
//! One-directional: remote contacts missing locally are inserted; local
//! records absent remotely are kept, so user annotations survive remote
//! pruning. Membership by id is the watermark; the operation is safe to
//! repeat.

use std::collections::HashSet;

use chrono::Utc;

use super::{ConnectionError, ConnectionService};
use crate::models::{ConnectionRecord, ConnectionRole, ConnectionState, RemoteContact};

impl ConnectionService {
    /// Insert a local record for every remote contact not yet present.
    /// Returns the number of records inserted; zero on a repeat call with
    /// an unchanged remote list.
    pub async fn sync_remote_contacts(&self) -> Result<usize, ConnectionError> {
        let contacts = self.agent().list_contacts().await?;
        let known: HashSet<String> = self
            .db()
            .get_all_connections()?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let mut inserted = 0;
        for contact in contacts {
            if known.contains(contact.id()) {
                continue;
            }
            let record = record_from_contact(&contact);
            self.db().save_connection(&record)?;
            self.publish_state_change(&record);
            inserted += 1;
        }

        if inserted > 0 {
            log::info!("Synced {} new contacts from the agent", inserted);
        }
        Ok(inserted)
    }
}

fn record_from_contact(contact: &RemoteContact) -> ConnectionRecord {
    ConnectionRecord {
        id: contact.id().to_string(),
        created_at: Utc::now(),
        label: contact.alias().map(|a| a.to_string()),
        logo: None,
        oobi: contact.oobi().map(|o| o.to_string()),
        state: ConnectionState::Completed,
        role: ConnectionRole::Requester,
        auto_accept_connection: false,
        out_of_band_id: None,
        group_id: contact.group_id().map(|g| g.to_string()),
    }
}
