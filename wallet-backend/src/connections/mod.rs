//! Connection management engine.
//!
//! `ConnectionService` is the public surface the UI shell talks to:
//! receiving and accepting invitations, listing and deleting connections,
//! notes, multi-sig group linkage, and reconciliation against the remote
//! agent's contact list. Collaborators are injected at construction; there
//! is no process-wide agent singleton.

pub mod classify;
pub mod error;
pub mod events;
pub mod invitation;

mod multisig;
mod notes;
mod sync;


pub use error::ConnectionError;
pub use events::{ConnectionEvents, ConnectionStateChangedEvent};
pub use multisig::OobiConnection;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentClient, ResolveOobiPolicy};
use crate::db::Database;
use crate::models::{
    ConnectionDetails, ConnectionRecord, ConnectionShortDetails, ConnectionState, OutOfBandRecord,
};

/// Outcome of receiving an invitation URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReceivedInvitation {
    /// A full invitation resolved into a connection record.
    Connection { connection: ConnectionShortDetails },
    /// A connectionless message was delivered to the agent; no connection
    /// was created.
    ConnectionlessMessage,
}

/// A mediator-created invitation ready to be shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediatorInvitation {
    pub invitation_url: String,
    pub record: OutOfBandRecord,
}

pub struct ConnectionService {
    db: Arc<Database>,
    agent: AgentClient,
    events: Arc<ConnectionEvents>,
    policy: ResolveOobiPolicy,
    http: reqwest::Client,
}

impl ConnectionService {
    pub fn new(
        db: Arc<Database>,
        agent: AgentClient,
        events: Arc<ConnectionEvents>,
        policy: ResolveOobiPolicy,
    ) -> Self {
        ConnectionService {
            db,
            agent,
            events,
            policy,
            http: reqwest::Client::new(),
        }
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    pub(crate) fn agent(&self) -> &AgentClient {
        &self.agent
    }

    pub(crate) fn policy(&self) -> &ResolveOobiPolicy {
        &self.policy
    }

    /// The state-changed event channel. No replay: subscribe before the
    /// operation whose events you want to observe.
    pub fn events(&self) -> Arc<ConnectionEvents> {
        self.events.clone()
    }

    pub(crate) fn publish_state_change(&self, record: &ConnectionRecord) {
        self.events.publish(ConnectionStateChangedEvent {
            connection_id: record.id.clone(),
            state: record.state,
            status: record.status(),
        });
    }

    /// Receive an invitation URL: dereference it when shortened, then either
    /// deliver the connectionless message it carries or resolve it into a
    /// persisted connection.
    pub async fn receive_invitation(
        &self,
        url: &str,
    ) -> Result<ReceivedInvitation, ConnectionError> {
        let url = if invitation::is_shortened(url) {
            invitation::resolve_shortened(&self.http, url).await?
        } else {
            url.to_string()
        };

        if let Some(message) = invitation::decode_connectionless(&url)? {
            self.agent.receive_message(&message).await?;
            return Ok(ReceivedInvitation::ConnectionlessMessage);
        }

        let record = self.agent.resolve_oobi(&url, &self.policy).await?;
        self.db.save_connection(&record)?;
        self.publish_state_change(&record);
        log::info!("Resolved invitation into connection {}", record.id);
        Ok(ReceivedInvitation::Connection {
            connection: ConnectionShortDetails::from(&record),
        })
    }

    /// Accept an incoming connection request.
    pub async fn accept_request(&self, connection_id: &str) -> Result<(), ConnectionError> {
        self.agent.accept_request(connection_id).await?;
        self.transition(connection_id, ConnectionState::ResponseSent)
    }

    /// Accept the counterparty's response to a request we sent.
    pub async fn accept_response(&self, connection_id: &str) -> Result<(), ConnectionError> {
        self.agent.accept_response(connection_id).await?;
        self.transition(connection_id, ConnectionState::Completed)
    }

    fn transition(&self, connection_id: &str, state: ConnectionState) -> Result<(), ConnectionError> {
        if self.db.update_connection_state(connection_id, state)? {
            if let Some(record) = self.db.get_connection(connection_id)? {
                self.publish_state_change(&record);
            }
        }
        Ok(())
    }

    /// Create an out-of-band invitation through the mediator and wrap it as
    /// a shareable `didcomm://invite` URL.
    pub async fn create_mediator_invitation(
        &self,
        label: &str,
    ) -> Result<MediatorInvitation, ConnectionError> {
        let record = self
            .agent
            .create_invitation(label)
            .await
            .map_err(|e| {
                log::warn!("Mediator invitation creation failed: {}", e);
                ConnectionError::OobViaMediatorFailed
            })?;
        if record.invitation.services.is_empty() {
            return Err(ConnectionError::OobViaMediatorFailed);
        }
        let invitation_url = invitation::encode_invitation_url(&record.invitation)?;
        Ok(MediatorInvitation {
            invitation_url,
            record,
        })
    }

    /// Summary list of connections. Multi-sig-tagged records are excluded;
    /// they are surfaced through the group-scoped query instead.
    pub fn get_connections(&self) -> Result<Vec<ConnectionShortDetails>, ConnectionError> {
        let records = self.db.get_all_connections()?;
        Ok(records
            .iter()
            .filter(|r| r.group_id.is_none())
            .map(ConnectionShortDetails::from)
            .collect())
    }

    /// Connections awaiting user action: incoming requests and received
    /// responses, minus auto-accept records (they resolve on their own).
    pub fn get_pending_connections(
        &self,
    ) -> Result<Vec<ConnectionShortDetails>, ConnectionError> {
        let records = self.db.get_all_connections()?;
        Ok(records
            .iter()
            .filter(|r| r.group_id.is_none())
            .filter(|r| {
                classify::is_connection_request_received(r)
                    || classify::is_connection_response_received(r)
            })
            .map(ConnectionShortDetails::from)
            .collect())
    }

    /// Detailed view of one connection, enriched with the originating
    /// out-of-band invitation when the agent still holds it.
    pub async fn get_connection_by_id(
        &self,
        id: &str,
    ) -> Result<ConnectionDetails, ConnectionError> {
        let record = self
            .db
            .get_connection(id)?
            .ok_or_else(|| ConnectionError::ConnectionNotFound { id: id.to_string() })?;
        let notes = self.db.get_notes_by_connection(id)?;

        let oob = match &record.out_of_band_id {
            Some(oob_id) => self.agent.get_oob_record(oob_id).await?,
            None => None,
        };
        let invitation = oob.map(|r| r.invitation);

        Ok(ConnectionDetails {
            id: record.id.clone(),
            connection_date: record.created_at.to_rfc3339(),
            label: record.label.clone(),
            logo: record.logo.clone(),
            status: record.status(),
            group_id: record.group_id.clone(),
            goal_code: invitation.as_ref().and_then(|i| i.goal_code.clone()),
            handshake_protocols: invitation
                .as_ref()
                .and_then(|i| i.handshake_protocols.clone()),
            request_attachments: invitation
                .as_ref()
                .and_then(|i| i.appended_attachments.clone()),
            service_endpoints: invitation.map(|i| i.services),
            notes,
        })
    }

    /// Summary view of one connection.
    pub fn get_connection_short_detail(
        &self,
        id: &str,
    ) -> Result<ConnectionShortDetails, ConnectionError> {
        let record = self
            .db
            .get_connection(id)?
            .ok_or_else(|| ConnectionError::ConnectionNotFound { id: id.to_string() })?;
        Ok(ConnectionShortDetails::from(&record))
    }

    /// Delete a connection and all notes attached to it. Notes go first;
    /// a note-deletion failure aborts before the connection is touched.
    pub fn delete_connection(&self, id: &str) -> Result<(), ConnectionError> {
        let notes = self.db.get_notes_by_connection(id)?;
        for note in &notes {
            self.db.delete_note(&note.id)?;
        }
        self.db.delete_connection(id)?;
        log::info!("Deleted connection {} and {} notes", id, notes.len());
        Ok(())
    }
}
