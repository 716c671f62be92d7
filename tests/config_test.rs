//! Environment-driven configuration for both services

use std::env;
use std::sync::Mutex;
use std::time::Duration;

use focusflow::config::{ServiceConfig, ServiceKind};
use focusflow::error::FocusFlowError;

// Tests in this file mutate process-wide environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 7] = [
    "FOCUSFLOW_HOST",
    "FOCUSFLOW_USER_PORT",
    "FOCUSFLOW_TASK_PORT",
    "FOCUSFLOW_JWT_SECRET",
    "JWT_SECRET",
    "FOCUSFLOW_TOKEN_TTL_HOURS",
    "FOCUSFLOW_MIN_AUTH_MS",
];

const GOOD_KEY: &str = "k9Xq2vLr8TzW4nBp7MdY1sHc6JfG3aEu0";

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_missing_secret_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let config = ServiceConfig::from_env(ServiceKind::Task);
    assert!(matches!(config, Err(FocusFlowError::ConfigError(_))));
}

#[test]
fn test_weak_secrets_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("FOCUSFLOW_JWT_SECRET", "too-short-1");
    let short = ServiceConfig::from_env(ServiceKind::User);
    assert!(short.unwrap_err().to_string().contains("at least 32 characters"));

    env::set_var("FOCUSFLOW_JWT_SECRET", "changeme-changeme-changeme-changeme-42");
    let example = ServiceConfig::from_env(ServiceKind::User);
    assert!(example.unwrap_err().to_string().contains("insecure pattern"));

    clear_env();
}

#[test]
fn test_defaults_per_service() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    env::set_var("FOCUSFLOW_JWT_SECRET", GOOD_KEY);

    let user = ServiceConfig::from_env(ServiceKind::User).unwrap();
    let task = ServiceConfig::from_env(ServiceKind::Task).unwrap();

    assert_eq!(user.port, 8081);
    assert_eq!(task.port, 8082);
    assert_eq!(user.jwt_secret, task.jwt_secret);
    assert_eq!(user.token_ttl, Duration::from_secs(24 * 3600));
    assert_eq!(user.min_auth_duration, Duration::from_millis(100));
    assert_eq!(user.bind_address(), format!("{}:8081", user.host));

    clear_env();
}

#[test]
fn test_overrides_and_fallback_secret() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    env::set_var("JWT_SECRET", GOOD_KEY);
    env::set_var("FOCUSFLOW_HOST", "0.0.0.0");
    env::set_var("FOCUSFLOW_TASK_PORT", "9090");
    env::set_var("FOCUSFLOW_TOKEN_TTL_HOURS", "2");
    env::set_var("FOCUSFLOW_MIN_AUTH_MS", "0");

    let task = ServiceConfig::from_env(ServiceKind::Task).unwrap();
    assert_eq!(task.jwt_secret, GOOD_KEY);
    assert_eq!(task.bind_address(), "0.0.0.0:9090");
    assert_eq!(task.token_ttl, Duration::from_secs(2 * 3600));
    assert_eq!(task.min_auth_duration, Duration::ZERO);

    // Unparseable values fall back to defaults
    env::set_var("FOCUSFLOW_TASK_PORT", "not-a-port");
    env::set_var("FOCUSFLOW_TOKEN_TTL_HOURS", "0");
    let task = ServiceConfig::from_env(ServiceKind::Task).unwrap();
    assert_eq!(task.port, 8082);
    assert_eq!(task.token_ttl, Duration::from_secs(24 * 3600));

    clear_env();
}
