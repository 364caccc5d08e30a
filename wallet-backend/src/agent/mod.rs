//! Client for the remote identity agent (KERIA).
//!
//! The engine talks to the agent through `AgentClient`, an enum over the
//! real HTTP client and a scripted mock used by tests. All cryptographic
//! operations (key events, signing, witnessing) happen on the agent side;
//! this module only carries requests and typed responses.

pub mod keria;

pub use keria::KeriaClient;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    ConnectionRecord, ConnectionRole, ConnectionState, OutOfBandRecord, RemoteContact,
};

/// Error from a remote agent call.
#[derive(Debug, Clone)]
pub struct AgentError {
    pub message: String,
    pub status: Option<u16>,
}

impl AgentError {
    pub fn new(message: impl Into<String>) -> Self {
        AgentError {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        AgentError {
            message: message.into(),
            status: Some(status),
        }
    }
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "agent error ({}): {}", status, self.message),
            None => write!(f, "agent error: {}", self.message),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AgentError::with_status(e.to_string(), status.as_u16()),
            None => AgentError::new(e.to_string()),
        }
    }
}

/// Auto-accept policy passed along when resolving an invitation.
#[derive(Debug, Clone)]
pub struct ResolveOobiPolicy {
    pub auto_accept_connection: bool,
}

impl Default for ResolveOobiPolicy {
    fn default() -> Self {
        ResolveOobiPolicy {
            auto_accept_connection: true,
        }
    }
}

/// Unified agent client over the configured transport.
pub enum AgentClient {
    Keria(KeriaClient),
    Mock(MockAgentClient),
}

impl AgentClient {
    /// Resolve a full out-of-band invitation URL into a connection record.
    pub async fn resolve_oobi(
        &self,
        url: &str,
        policy: &ResolveOobiPolicy,
    ) -> Result<ConnectionRecord, AgentError> {
        match self {
            AgentClient::Keria(client) => client.resolve_oobi(url, policy).await,
            AgentClient::Mock(mock) => mock.resolve_oobi(url, policy),
        }
    }

    /// Accept an incoming connection request.
    pub async fn accept_request(&self, connection_id: &str) -> Result<(), AgentError> {
        match self {
            AgentClient::Keria(client) => client.accept_request(connection_id).await,
            AgentClient::Mock(mock) => mock.accept(AgentCall::AcceptRequest {
                connection_id: connection_id.to_string(),
            }),
        }
    }

    /// Accept the counterparty's response to a request we sent.
    pub async fn accept_response(&self, connection_id: &str) -> Result<(), AgentError> {
        match self {
            AgentClient::Keria(client) => client.accept_response(connection_id).await,
            AgentClient::Mock(mock) => mock.accept(AgentCall::AcceptResponse {
                connection_id: connection_id.to_string(),
            }),
        }
    }

    /// Deliver a connectionless message carried by an OOBI attachment.
    pub async fn receive_message(&self, message: &str) -> Result<(), AgentError> {
        match self {
            AgentClient::Keria(client) => client.receive_message(message).await,
            AgentClient::Mock(mock) => mock.accept(AgentCall::ReceiveMessage {
                message: message.to_string(),
            }),
        }
    }

    /// Create an out-of-band invitation through the mediator.
    pub async fn create_invitation(
        &self,
        label: &str,
    ) -> Result<OutOfBandRecord, AgentError> {
        match self {
            AgentClient::Keria(client) => client.create_invitation(label).await,
            AgentClient::Mock(mock) => mock.create_invitation(label),
        }
    }

    /// Fetch the out-of-band record a connection originated from.
    pub async fn get_oob_record(
        &self,
        out_of_band_id: &str,
    ) -> Result<Option<OutOfBandRecord>, AgentError> {
        match self {
            AgentClient::Keria(client) => client.get_oob_record(out_of_band_id).await,
            AgentClient::Mock(mock) => mock.get_oob_record(out_of_band_id),
        }
    }

    /// List all contacts known to the agent.
    pub async fn list_contacts(&self) -> Result<Vec<RemoteContact>, AgentError> {
        match self {
            AgentClient::Keria(client) => client.list_contacts().await,
            AgentClient::Mock(mock) => mock.list_contacts(),
        }
    }

    /// Fetch a single contact by id.
    pub async fn get_contact(&self, id: &str) -> Result<Option<RemoteContact>, AgentError> {
        match self {
            AgentClient::Keria(client) => client.get_contact(id).await,
            AgentClient::Mock(mock) => mock.get_contact(id),
        }
    }
}

/// One recorded call against the mock agent.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCall {
    ResolveOobi { url: String },
    AcceptRequest { connection_id: String },
    AcceptResponse { connection_id: String },
    ReceiveMessage { message: String },
    CreateInvitation { label: String },
    GetOobRecord { out_of_band_id: String },
    ListContacts,
    GetContact { id: String },
}

/// Mock agent for tests - returns pre-configured responses from queues and
/// records every call for assertions.
#[derive(Clone, Default)]
pub struct MockAgentClient {
    resolve_results: Arc<Mutex<VecDeque<Result<ConnectionRecord, AgentError>>>>,
    invitation_results: Arc<Mutex<VecDeque<Result<OutOfBandRecord, AgentError>>>>,
    contacts: Arc<Mutex<Vec<RemoteContact>>>,
    oob_records: Arc<Mutex<HashMap<String, OutOfBandRecord>>>,
    calls: Arc<Mutex<Vec<AgentCall>>>,
}

impl MockAgentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `resolve_oobi` outcome.
    pub fn push_resolve_result(&self, result: Result<ConnectionRecord, AgentError>) {
        self.resolve_results.lock().unwrap().push_back(result);
    }

    /// Queue the next `create_invitation` outcome.
    pub fn push_invitation_result(&self, result: Result<OutOfBandRecord, AgentError>) {
        self.invitation_results.lock().unwrap().push_back(result);
    }

    /// Replace the remote contact list returned by `list_contacts`.
    pub fn set_contacts(&self, contacts: Vec<RemoteContact>) {
        *self.contacts.lock().unwrap() = contacts;
    }

    /// Register an out-of-band record for `get_oob_record`.
    pub fn insert_oob_record(&self, record: OutOfBandRecord) {
        self.oob_records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    /// All calls made against this mock, in order.
    pub fn calls(&self) -> Vec<AgentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: AgentCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn accept(&self, call: AgentCall) -> Result<(), AgentError> {
        self.record(call);
        Ok(())
    }

    fn resolve_oobi(
        &self,
        url: &str,
        policy: &ResolveOobiPolicy,
    ) -> Result<ConnectionRecord, AgentError> {
        self.record(AgentCall::ResolveOobi {
            url: url.to_string(),
        });
        if let Some(result) = self.resolve_results.lock().unwrap().pop_front() {
            return result;
        }
        // Queue exhausted: synthesize a freshly completed connection
        Ok(ConnectionRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            label: None,
            logo: None,
            oobi: Some(url.to_string()),
            state: ConnectionState::Completed,
            role: ConnectionRole::Requester,
            auto_accept_connection: policy.auto_accept_connection,
            out_of_band_id: None,
            group_id: None,
        })
    }

    fn create_invitation(&self, label: &str) -> Result<OutOfBandRecord, AgentError> {
        self.record(AgentCall::CreateInvitation {
            label: label.to_string(),
        });
        match self.invitation_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Err(AgentError::new("no invitation queued")),
        }
    }

    fn get_oob_record(&self, id: &str) -> Result<Option<OutOfBandRecord>, AgentError> {
        self.record(AgentCall::GetOobRecord {
            out_of_band_id: id.to_string(),
        });
        Ok(self.oob_records.lock().unwrap().get(id).cloned())
    }

    fn list_contacts(&self) -> Result<Vec<RemoteContact>, AgentError> {
        self.record(AgentCall::ListContacts);
        Ok(self.contacts.lock().unwrap().clone())
    }

    fn get_contact(&self, id: &str) -> Result<Option<RemoteContact>, AgentError> {
        self.record(AgentCall::GetContact { id: id.to_string() });
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts.iter().find(|c| c.id() == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls_and_serves_contacts() {
        let mock = MockAgentClient::new();
        mock.set_contacts(vec![RemoteContact::Peer {
            id: "aid1".to_string(),
            alias: Some("Alice".to_string()),
            oobi: None,
        }]);
        let agent = AgentClient::Mock(mock.clone());

        let contacts = agent.list_contacts().await.unwrap();
        assert_eq!(contacts.len(), 1);

        let contact = agent.get_contact("aid1").await.unwrap().unwrap();
        assert_eq!(contact.alias(), Some("Alice"));
        assert!(agent.get_contact("aid2").await.unwrap().is_none());

        assert_eq!(
            mock.calls(),
            vec![
                AgentCall::ListContacts,
                AgentCall::GetContact {
                    id: "aid1".to_string()
                },
                AgentCall::GetContact {
                    id: "aid2".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_resolve_queue_drains_in_order() {
        let mock = MockAgentClient::new();
        mock.push_resolve_result(Err(AgentError::new("resolution timed out")));
        let agent = AgentClient::Mock(mock.clone());
        let policy = ResolveOobiPolicy::default();

        assert!(agent.resolve_oobi("http://host/oobi/x", &policy).await.is_err());

        // Queue drained: the mock synthesizes a resolved record
        let record = agent.resolve_oobi("http://host/oobi/x", &policy).await.unwrap();
        assert_eq!(record.oobi.as_deref(), Some("http://host/oobi/x"));
        assert_eq!(record.state, ConnectionState::Completed);
    }
}
