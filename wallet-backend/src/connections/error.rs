//! Error taxonomy for connection operations.
//!
//! Every failure surfaces to the caller with enough payload to act on
//! (e.g. the existing id inside `DuplicateConnection`); nothing is retried
//! or silently recovered here.

use crate::agent::AgentError;

/// Marker the remote agent puts in its message when an invitation was
/// already resolved into an existing connection.
const DUPLICATE_MARKER: &str = "already exists with id";

#[derive(Debug)]
pub enum ConnectionError {
    /// Malformed or undecodable invitation URL or attachment.
    InvalidInvitation(String),
    /// A legacy `c_i` attachment where a `d_m` connectionless message is required.
    InvalidConnectionlessMsg,
    /// Dereferencing a shortened invitation URL failed.
    ShortenResolutionFailed(String),
    /// The mediator returned an unusable out-of-band invitation.
    OobViaMediatorFailed,
    /// The agent reports the invitation already resolved into this connection.
    DuplicateConnection { connection_id: String },
    NoteNotFound { connection_id: String },
    ConnectionNotFound { id: String },
    Agent(AgentError),
    Storage(rusqlite::Error),
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::InvalidInvitation(reason) => {
                write!(f, "invalid invitation: {}", reason)
            }
            ConnectionError::InvalidConnectionlessMsg => {
                write!(f, "invalid connectionless message transferred by oobi url")
            }
            ConnectionError::ShortenResolutionFailed(reason) => {
                write!(f, "could not resolve shortened invitation url: {}", reason)
            }
            ConnectionError::OobViaMediatorFailed => {
                write!(f, "could not create out-of-band invitation via mediator")
            }
            ConnectionError::DuplicateConnection { connection_id } => {
                write!(f, "connection already exists with id {}", connection_id)
            }
            ConnectionError::NoteNotFound { connection_id } => {
                write!(f, "connection note record not found for connection {}", connection_id)
            }
            ConnectionError::ConnectionNotFound { id } => {
                write!(f, "connection record not found for id {}", id)
            }
            ConnectionError::Agent(e) => write!(f, "{}", e),
            ConnectionError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for ConnectionError {}

impl From<AgentError> for ConnectionError {
    fn from(e: AgentError) -> Self {
        ConnectionError::Agent(e)
    }
}

impl From<rusqlite::Error> for ConnectionError {
    fn from(e: rusqlite::Error) -> Self {
        ConnectionError::Storage(e)
    }
}

/// Pull the existing connection id out of the agent's duplicate message,
/// e.g. "Record already exists with id connectionId".
pub(crate) fn extract_duplicate_id(message: &str) -> Option<String> {
    let (_, rest) = message.split_once(DUPLICATE_MARKER)?;
    let id = rest
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '_');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_from_agent_message() {
        assert_eq!(
            extract_duplicate_id("Record already exists with id connectionId"),
            Some("connectionId".to_string())
        );
        assert_eq!(
            extract_duplicate_id("contact already exists with id EGrdt, skipping."),
            Some("EGrdt".to_string())
        );
    }

    #[test]
    fn test_no_id_in_unrelated_message() {
        assert_eq!(extract_duplicate_id("resolution timed out"), None);
        assert_eq!(extract_duplicate_id("already exists with id "), None);
    }
}
