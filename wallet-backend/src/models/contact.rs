use serde::{Deserialize, Serialize};

/// A contact as reported by the remote agent, resolved once at ingestion
/// into a variant per connection source. Group-tagged contacts belong to a
/// multi-sig group that is still being established.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteContact {
    Peer {
        id: String,
        alias: Option<String>,
        oobi: Option<String>,
    },
    GroupMember {
        id: String,
        alias: Option<String>,
        oobi: Option<String>,
        group_id: String,
    },
}

impl RemoteContact {
    pub fn id(&self) -> &str {
        match self {
            RemoteContact::Peer { id, .. } => id,
            RemoteContact::GroupMember { id, .. } => id,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            RemoteContact::Peer { alias, .. } => alias.as_deref(),
            RemoteContact::GroupMember { alias, .. } => alias.as_deref(),
        }
    }

    pub fn oobi(&self) -> Option<&str> {
        match self {
            RemoteContact::Peer { oobi, .. } => oobi.as_deref(),
            RemoteContact::GroupMember { oobi, .. } => oobi.as_deref(),
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            RemoteContact::Peer { .. } => None,
            RemoteContact::GroupMember { group_id, .. } => Some(group_id),
        }
    }
}
