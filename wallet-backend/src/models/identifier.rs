use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group establishment metadata carried by an identifier that was created
/// to join a multi-sig group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetadata {
    pub group_id: String,
    /// Whether this device initiated the group (first scan).
    pub group_initiator: bool,
    /// True once the joint group identifier has been created.
    pub group_created: bool,
}

/// A locally held identifier. The identifier lifecycle (key management,
/// rotation) lives outside this service; the connection engine only reads
/// these records to classify incoming group OOBIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierRecord {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_metadata: Option<GroupMetadata>,
}
