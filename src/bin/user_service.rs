use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use focusflow::auth::{Argon2Comparator, AuthenticationGate, IdentityResolver, TokenManager};
use focusflow::config::{ServiceConfig, ServiceKind};
use focusflow::handlers::user_service_api;
use focusflow::storage::MemoryCredentialStore;
use focusflow::users::UserService;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    let config = match ServiceConfig::from_env(ServiceKind::User) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}s",
        config.host,
        config.port,
        config.token_ttl.as_secs()
    );

    let tokens = Arc::new(TokenManager::with_ttl(&config.jwt_secret, config.token_ttl));
    let service = Arc::new(
        UserService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(Argon2Comparator::new()),
            tokens.clone(),
        )
        .with_min_auth_duration(config.min_auth_duration),
    );
    let gate = Arc::new(AuthenticationGate::new(tokens, IdentityResolver::new()));

    let routes = user_service_api(service, gate);

    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting FocusFlow user service on {}", addr);
    warp::serve(routes).run(addr).await;
}
