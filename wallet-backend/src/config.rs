use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const KERIA_URL: &str = "KERIA_URL";
    pub const AUTO_ACCEPT_CONNECTIONS: &str = "AUTO_ACCEPT_CONNECTIONS";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/wallet.db";
    pub const KERIA_URL: &str = "http://127.0.0.1:3901";
    pub const AUTO_ACCEPT_CONNECTIONS: bool = true;
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub keria_url: String,
    /// Resolve-invitation policy: accept connections without user action.
    pub auto_accept_connections: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            keria_url: env::var(env_vars::KERIA_URL)
                .unwrap_or_else(|_| defaults::KERIA_URL.to_string()),
            auto_accept_connections: env::var(env_vars::AUTO_ACCEPT_CONNECTIONS)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults::AUTO_ACCEPT_CONNECTIONS),
        }
    }
}
