use actix_web::{web, HttpResponse, Responder};

use super::error_response;
use crate::models::NoteContent;
use crate::AppState;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/connections/{id}/notes")
            .route(web::post().to(create_note))
            .route(web::put().to(update_note)),
    );
    cfg.service(web::resource("/api/notes/{note_id}").route(web::delete().to(delete_note)));
}

async fn create_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NoteContent>,
) -> impl Responder {
    let connection_id = path.into_inner();
    match data.connections.create_note(&connection_id, &body) {
        Ok(note_id) => HttpResponse::Ok().json(serde_json::json!({ "id": note_id })),
        Err(e) => error_response("Failed to create note", e),
    }
}

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NoteContent>,
) -> impl Responder {
    let connection_id = path.into_inner();
    match data.connections.update_note(&connection_id, &body) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "updated": connection_id })),
        Err(e) => error_response("Failed to update note", e),
    }
}

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let note_id = path.into_inner();
    match data.connections.delete_note(&note_id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "deleted": note_id })),
        Err(e) => error_response("Failed to delete note", e),
    }
}
