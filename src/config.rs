//! Service configuration module
//! Loads the parameters shared by the user and task services from the environment

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MIN_AUTH_MILLIS, DEFAULT_TASK_SERVICE_PORT, DEFAULT_TOKEN_TTL_HOURS,
    DEFAULT_USER_SERVICE_PORT,
};
use crate::error::{FocusFlowError, Result};
use std::env;
use std::time::Duration;

/// Which of the two services a configuration is loaded for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    User,
    Task,
}

impl ServiceKind {
    fn port_var(&self) -> &'static str {
        match self {
            ServiceKind::User => "FOCUSFLOW_USER_PORT",
            ServiceKind::Task => "FOCUSFLOW_TASK_PORT",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            ServiceKind::User => DEFAULT_USER_SERVICE_PORT,
            ServiceKind::Task => DEFAULT_TASK_SERVICE_PORT,
        }
    }
}

/// Service configuration parameters
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub kind: ServiceKind,
    pub host: String,
    pub port: u16,
    /// JWT secret shared by both services for token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Minimum duration of a login attempt, success or failure
    pub min_auth_duration: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        panic!("ServiceConfig::default() is not allowed for security reasons. Use ServiceConfig::from_env() instead.");
    }
}

impl ServiceConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    pub fn for_testing(kind: ServiceKind) -> Self {
        Self {
            kind,
            host: "127.0.0.1".to_string(),
            port: kind.default_port(),
            jwt_secret: "test-jwt-key-only-for-unit-tests-never-use-in-production".to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 3600),
            min_auth_duration: Duration::ZERO,
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(FocusFlowError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(FocusFlowError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FocusFlowError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env(kind: ServiceKind) -> Result<Self> {
        let host = env::var("FOCUSFLOW_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var(kind.port_var())
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(kind.default_port());

        let ttl_hours = env::var("FOCUSFLOW_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let min_auth_millis = env::var("FOCUSFLOW_MIN_AUTH_MS")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(DEFAULT_MIN_AUTH_MILLIS);

        let jwt_secret = env::var("FOCUSFLOW_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                FocusFlowError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Both services must share the same value. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            kind,
            host,
            port,
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_hours * 3600),
            min_auth_duration: Duration::from_millis(min_auth_millis),
        })
    }

    /// Socket address string the service binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
