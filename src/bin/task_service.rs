use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use focusflow::auth::{AuthenticationGate, IdentityResolver, TokenManager};
use focusflow::config::{ServiceConfig, ServiceKind};
use focusflow::handlers::task_service_api;
use focusflow::storage::MemoryTaskStore;
use focusflow::tasks::TaskService;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    let config = match ServiceConfig::from_env(ServiceKind::Task) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // Verification only; this service never issues tokens
    let tokens = Arc::new(TokenManager::new(&config.jwt_secret));
    let gate = Arc::new(AuthenticationGate::new(tokens, IdentityResolver::new()));
    let service = Arc::new(TaskService::new(Arc::new(MemoryTaskStore::new())));

    let routes = task_service_api(service, gate);

    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting FocusFlow task service on {}", addr);
    warp::serve(routes).run(addr).await;
}
