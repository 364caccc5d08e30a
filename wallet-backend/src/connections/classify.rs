//! Lifecycle predicates over connection records.
//!
//! Used for the pending-action views and for collapsing a record to its
//! display status. At most one predicate is true for any record; records in
//! transitional or auto-accept states match none, since they resolve
//! without user action.

use crate::models::{ConnectionRecord, ConnectionRole, ConnectionState};

/// The counterparty asked to connect and the user has not acted yet.
pub fn is_connection_request_received(record: &ConnectionRecord) -> bool {
    record.role == ConnectionRole::Responder
        && record.state == ConnectionState::RequestReceived
        && !record.auto_accept_connection
}

/// We accepted an incoming request and sent our response.
pub fn is_connection_response_sent(record: &ConnectionRecord) -> bool {
    record.role == ConnectionRole::Responder && record.state == ConnectionState::ResponseSent
}

/// We initiated the connection and are waiting on the counterparty.
pub fn is_connection_request_sent(record: &ConnectionRecord) -> bool {
    record.role == ConnectionRole::Requester && record.state == ConnectionState::RequestSent
}

/// The counterparty accepted our request and the user has not confirmed yet.
pub fn is_connection_response_received(record: &ConnectionRecord) -> bool {
    record.role == ConnectionRole::Requester
        && record.state == ConnectionState::ResponseReceived
        && !record.auto_accept_connection
}

/// The exchange completed on both sides.
pub fn is_connection_connected(record: &ConnectionRecord) -> bool {
    record.state == ConnectionState::Completed
}
