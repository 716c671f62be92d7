//! Shared fixtures for the service-level tests

#![allow(dead_code)]

use std::sync::Arc;

use warp::http::Response;
use warp::hyper::body::Bytes;

use focusflow::auth::{Argon2Comparator, AuthenticationGate, IdentityResolver, TokenManager};
use focusflow::storage::{MemoryCredentialStore, MemoryTaskStore};
use focusflow::tasks::TaskService;
use focusflow::users::UserService;

pub const SIGNING_KEY: &str = "integration-signing-key-shared-by-both-services-7731";

pub fn token_manager() -> Arc<TokenManager> {
    Arc::new(TokenManager::new(SIGNING_KEY))
}

pub fn gate(tokens: Arc<TokenManager>) -> Arc<AuthenticationGate> {
    Arc::new(AuthenticationGate::new(tokens, IdentityResolver::new()))
}

pub fn task_service() -> Arc<TaskService> {
    Arc::new(TaskService::new(Arc::new(MemoryTaskStore::new())))
}

pub fn user_service(tokens: Arc<TokenManager>) -> Arc<UserService> {
    Arc::new(UserService::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(Argon2Comparator::new()),
        tokens,
    ))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn json_body(response: &Response<Bytes>) -> serde_json::Value {
    serde_json::from_slice(response.body()).expect("response body should be JSON")
}
