pub mod connections;
pub mod health;
pub mod notes;

use actix_web::HttpResponse;

use crate::connections::ConnectionError;

/// Map an engine error onto an HTTP response. The duplicate case carries
/// the existing connection id so the UI can redirect instead of erroring.
pub fn error_response(context: &str, e: ConnectionError) -> HttpResponse {
    match &e {
        ConnectionError::DuplicateConnection { connection_id } => {
            HttpResponse::Conflict().json(serde_json::json!({
                "error": e.to_string(),
                "connectionId": connection_id
            }))
        }
        ConnectionError::ConnectionNotFound { .. } | ConnectionError::NoteNotFound { .. } => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        ConnectionError::InvalidInvitation(_)
        | ConnectionError::InvalidConnectionlessMsg
        | ConnectionError::ShortenResolutionFailed(_) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        ConnectionError::OobViaMediatorFailed | ConnectionError::Agent(_) => {
            log::error!("{}: {}", context, e);
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        ConnectionError::Storage(_) => {
            log::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}
