//! Security-focused logging module to track security events
//!
//! Events go through the `log` facade under the `security` target so they can be
//! filtered separately, e.g. `RUST_LOG=security=info`. Tokens and passwords are never
//! part of an event.

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    // Authentication events
    LoginFailed { username: String },
    LoginSucceeded { username: String, user_id: i64 },
    TokenValidationFailed { subject: Option<String> },

    // Registration events
    RegistrationConflict { username: String, reason: String },

    // Authorization events
    OwnershipMismatch { user_id: i64, resource: String },
    PasswordChangeRejected { username: String },
}

impl SecurityEvent {
    /// Short key identifying the event type
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::LoginSucceeded { .. } => "login_succeeded",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::RegistrationConflict { .. } => "registration_conflict",
            SecurityEvent::OwnershipMismatch { .. } => "ownership_mismatch",
            SecurityEvent::PasswordChangeRejected { .. } => "password_change_rejected",
        }
    }
}

/// Log a security event
pub fn log_security_event(event: &SecurityEvent) {
    match event {
        SecurityEvent::LoginFailed { username } => {
            log::warn!(target: "security", "SECURITY: Login failed - User: {}", username);
        }
        SecurityEvent::LoginSucceeded { username, user_id } => {
            log::info!(target: "security", "SECURITY: Login success - User: {}, Id: {}", username, user_id);
        }
        SecurityEvent::TokenValidationFailed { subject } => {
            log::warn!(target: "security", "SECURITY: Token validation failed - Subject: {:?}", subject);
        }
        SecurityEvent::RegistrationConflict { username, reason } => {
            log::info!(target: "security", "SECURITY: Registration rejected - User: {}, Reason: {}", username, reason);
        }
        SecurityEvent::OwnershipMismatch { user_id, resource } => {
            log::warn!(target: "security", "SECURITY: Ownership mismatch - User: {}, Resource: {}", user_id, resource);
        }
        SecurityEvent::PasswordChangeRejected { username } => {
            log::warn!(target: "security", "SECURITY: Password change rejected - User: {}", username);
        }
    }
}
