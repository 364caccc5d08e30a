use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Out-of-band invitation payload carried inside a `didcomm://invite?oob=`
/// URL or held by the remote agent for a connection it resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutOfBandInvitation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handshake_protocols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appended_attachments: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OobRole {
    Sender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OobState {
    PrepareResponse,
    AwaitResponse,
    Done,
}

/// The remote agent's record of an invitation it created or received.
/// Owned transiently by the agent; the engine only reads it to enrich the
/// detailed connection view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutOfBandRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub invitation: OutOfBandInvitation,
    pub role: OobRole,
    pub state: OobState,
}
