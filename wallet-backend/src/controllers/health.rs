use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
    cfg.service(web::resource("/api/health/status").route(web::get().to(get_status)));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}

async fn get_status(state: web::Data<AppState>) -> impl Responder {
    let connection_count = match state.db.get_all_connections() {
        Ok(connections) => connections.len(),
        Err(e) => {
            log::error!("Failed to read connection count: {}", e);
            0
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "keriaUrl": state.config.keria_url,
        "connections": connection_count,
        "eventSubscribers": state.connections.events().subscriber_count()
    }))
}
