use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::note::ConnectionNote;

/// DID exchange lifecycle states as reported by the remote agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    RequestReceived,
    ResponseSent,
    RequestSent,
    ResponseReceived,
    Completed,
}

/// Which side of the exchange this wallet is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionRole {
    Requester,
    Responder,
}

/// Display status shown to the user: anything not completed is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Confirmed,
}

/// A durable connection record, persisted locally and kept in sync with the
/// remote agent's contact list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub label: Option<String>,
    pub logo: Option<String>,
    /// Invitation endpoint the record was created from, when known.
    pub oobi: Option<String>,
    pub state: ConnectionState,
    pub role: ConnectionRole,
    /// When true the record resolves without user action and is excluded
    /// from pending-action views.
    pub auto_accept_connection: bool,
    /// Weak back-reference to the originating out-of-band record.
    pub out_of_band_id: Option<String>,
    /// Multi-sig group this connection participates in establishing.
    pub group_id: Option<String>,
}

impl ConnectionRecord {
    pub fn status(&self) -> ConnectionStatus {
        match self.state {
            ConnectionState::Completed => ConnectionStatus::Confirmed,
            _ => ConnectionStatus::Pending,
        }
    }
}

/// Summary view returned by the connection listing (UI wire contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionShortDetails {
    pub id: String,
    pub connection_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl From<&ConnectionRecord> for ConnectionShortDetails {
    fn from(record: &ConnectionRecord) -> Self {
        Self {
            id: record.id.clone(),
            connection_date: record.created_at.to_rfc3339(),
            label: record.label.clone(),
            logo: record.logo.clone(),
            status: record.status(),
            group_id: record.group_id.clone(),
        }
    }
}

/// Detailed view for a single connection, enriched with the originating
/// out-of-band invitation when one is on file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    pub id: String,
    pub connection_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handshake_protocols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_attachments: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<Vec<String>>,
    pub notes: Vec<ConnectionNote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_snake_case() {
        assert_eq!(ConnectionState::RequestReceived.as_ref(), "request_received");
        assert_eq!(
            "response_sent".parse::<ConnectionState>().unwrap(),
            ConnectionState::ResponseSent
        );
        assert_eq!(ConnectionRole::Requester.as_ref(), "requester");
        assert!("no_such_state".parse::<ConnectionState>().is_err());
    }

    #[test]
    fn test_status_collapses_to_pending_or_confirmed() {
        let mut record = ConnectionRecord {
            id: "id".to_string(),
            created_at: Utc::now(),
            label: None,
            logo: None,
            oobi: None,
            state: ConnectionState::RequestSent,
            role: ConnectionRole::Requester,
            auto_accept_connection: false,
            out_of_band_id: None,
            group_id: None,
        };
        assert_eq!(record.status(), ConnectionStatus::Pending);
        record.state = ConnectionState::Completed;
        assert_eq!(record.status(), ConnectionStatus::Confirmed);
    }

    #[test]
    fn test_short_details_serializes_camel_case_and_omits_missing() {
        let record = ConnectionRecord {
            id: "id1".to_string(),
            created_at: Utc::now(),
            label: Some("Alice".to_string()),
            logo: None,
            oobi: None,
            state: ConnectionState::Completed,
            role: ConnectionRole::Requester,
            auto_accept_connection: false,
            out_of_band_id: None,
            group_id: None,
        };
        let json = serde_json::to_value(ConnectionShortDetails::from(&record)).unwrap();
        assert_eq!(json["status"], "confirmed");
        assert!(json.get("connectionDate").is_some());
        assert!(json.get("logo").is_none());
        assert!(json.get("groupId").is_none());
    }
}
