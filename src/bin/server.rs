use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use finlearn::config::ServerConfig;
use finlearn::handlers::{self, AppState};
use finlearn::payment::{DevPaymentVerifier, PaymentVerifier};
use finlearn::storage::{MemoryStore, StoreProvider};

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // In-memory entitlement store; a development admin is seeded so the
    // admin console is reachable without out-of-band provisioning
    let store = MemoryStore::new();
    if config.development_mode {
        if let Err(e) = store.seed_admin("admin@finlearn.dev", "dev-admin-password").await {
            warn!("Failed to seed development admin: {}", e);
        }
    }
    let store: Arc<dyn StoreProvider> = Arc::new(store);

    // Payment verification collaborator. The development verifier accepts
    // any non-empty reference; production wires a real provider here.
    let payments: Arc<dyn PaymentVerifier> = Arc::new(DevPaymentVerifier);

    let state = AppState::new(&config, store, payments);
    let routes = handlers::routes(state);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting FinLearn server on {}", addr);

    warp::serve(routes).run(addr).await;
}
