use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::error_response;
use crate::AppState;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/connections").route(web::get().to(list_connections)),
    );
    cfg.service(
        web::resource("/api/connections/pending").route(web::get().to(list_pending_connections)),
    );
    cfg.service(
        web::resource("/api/connections/receive-invitation")
            .route(web::post().to(receive_invitation)),
    );
    cfg.service(web::resource("/api/connections/oobi").route(web::post().to(connect_by_oobi)));
    cfg.service(
        web::resource("/api/connections/invitation")
            .route(web::post().to(create_mediator_invitation)),
    );
    cfg.service(web::resource("/api/connections/sync").route(web::post().to(sync_contacts)));
    cfg.service(
        web::resource("/api/connections/multisig/{group_id}")
            .route(web::get().to(multisig_linked_contacts)),
    );
    cfg.service(
        web::resource("/api/connections/{id}")
            .route(web::get().to(get_connection))
            .route(web::delete().to(delete_connection)),
    );
    cfg.service(
        web::resource("/api/connections/{id}/short").route(web::get().to(get_short_detail)),
    );
    cfg.service(
        web::resource("/api/connections/{id}/accept-request")
            .route(web::post().to(accept_request)),
    );
    cfg.service(
        web::resource("/api/connections/{id}/accept-response")
            .route(web::post().to(accept_response)),
    );
}

#[derive(Deserialize)]
struct InvitationUrlRequest {
    url: String,
}

#[derive(Deserialize)]
struct CreateInvitationRequest {
    label: Option<String>,
}

async fn list_connections(data: web::Data<AppState>) -> impl Responder {
    match data.connections.get_connections() {
        Ok(connections) => HttpResponse::Ok().json(connections),
        Err(e) => error_response("Failed to list connections", e),
    }
}

async fn list_pending_connections(data: web::Data<AppState>) -> impl Responder {
    match data.connections.get_pending_connections() {
        Ok(connections) => HttpResponse::Ok().json(connections),
        Err(e) => error_response("Failed to list pending connections", e),
    }
}

async fn receive_invitation(
    data: web::Data<AppState>,
    body: web::Json<InvitationUrlRequest>,
) -> impl Responder {
    match data.connections.receive_invitation(&body.url).await {
        Ok(received) => HttpResponse::Ok().json(received),
        Err(e) => error_response("Failed to receive invitation", e),
    }
}

async fn connect_by_oobi(
    data: web::Data<AppState>,
    body: web::Json<InvitationUrlRequest>,
) -> impl Responder {
    match data.connections.connect_by_oobi(&body.url).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response("Failed to connect by oobi", e),
    }
}

async fn create_mediator_invitation(
    data: web::Data<AppState>,
    body: web::Json<CreateInvitationRequest>,
) -> impl Responder {
    let label = body.label.as_deref().unwrap_or("Identity wallet");
    match data.connections.create_mediator_invitation(label).await {
        Ok(invitation) => HttpResponse::Ok().json(invitation),
        Err(e) => error_response("Failed to create mediator invitation", e),
    }
}

async fn sync_contacts(data: web::Data<AppState>) -> impl Responder {
    match data.connections.sync_remote_contacts().await {
        Ok(inserted) => HttpResponse::Ok().json(serde_json::json!({ "inserted": inserted })),
        Err(e) => error_response("Failed to sync contacts", e),
    }
}

async fn multisig_linked_contacts(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let group_id = path.into_inner();
    match data.connections.get_multisig_linked_contacts(&group_id) {
        Ok(contacts) => HttpResponse::Ok().json(contacts),
        Err(e) => error_response("Failed to list group contacts", e),
    }
}

async fn get_connection(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.connections.get_connection_by_id(&id).await {
        Ok(details) => HttpResponse::Ok().json(details),
        Err(e) => error_response("Failed to get connection", e),
    }
}

async fn get_short_detail(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.connections.get_connection_short_detail(&id) {
        Ok(details) => HttpResponse::Ok().json(details),
        Err(e) => error_response("Failed to get connection", e),
    }
}

async fn delete_connection(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.connections.delete_connection(&id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "deleted": id })),
        Err(e) => error_response("Failed to delete connection", e),
    }
}

async fn accept_request(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.connections.accept_request(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "accepted": id })),
        Err(e) => error_response("Failed to accept request", e),
    }
}

async fn accept_response(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.connections.accept_response(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "accepted": id })),
        Err(e) => error_response("Failed to accept response", e),
    }
}
