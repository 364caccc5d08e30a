use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agent;
mod config;
mod connections;
mod controllers;
mod db;
mod models;

use agent::{AgentClient, KeriaClient, ResolveOobiPolicy};
use config::Config;
use connections::{ConnectionEvents, ConnectionService};
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub connections: Arc<ConnectionService>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    log::info!("Using identity agent at {}", config.keria_url);
    let agent = AgentClient::Keria(KeriaClient::new(&config.keria_url));

    let events = Arc::new(ConnectionEvents::new());
    let policy = ResolveOobiPolicy {
        auto_accept_connection: config.auto_accept_connections,
    };
    let connections = Arc::new(ConnectionService::new(db.clone(), agent, events, policy));

    // Align local records with the agent's contact list before serving;
    // the sync endpoint repeats this on demand
    if let Err(e) = connections.sync_remote_contacts().await {
        log::warn!("Initial contact sync failed: {}", e);
    }

    let state = web::Data::new(AppState {
        db: db.clone(),
        config: config.clone(),
        connections,
    });

    log::info!("Starting wallet backend on port {}", port);
    HttpServer::new(move || {
        let cors = Cors::permissive();
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(controllers::health::config_routes)
            .configure(controllers::connections::config_routes)
            .configure(controllers::notes::config_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
