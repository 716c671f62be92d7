use serde::{Deserialize, Serialize};

use crate::constants::{MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::error::{FocusFlowError, Result};

/// Stored credential record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Assigned by the credential store on first save
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    /// PHC digest, never the cleartext password
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord {
    /// Creates an unsaved record
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password_hash,
            created_at: chrono::Utc::now(),
        }
    }

    /// Public view of the record, without the password digest
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// User information safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
}

/// Registration exchange input
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        let username_len = self.username.trim().chars().count();
        if username_len < MIN_USERNAME_LENGTH || username_len > MAX_USERNAME_LENGTH {
            return Err(FocusFlowError::ValidationError(format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )));
        }
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Login exchange input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login exchange output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub new_email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(FocusFlowError::ValidationError("Invalid email format".to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FocusFlowError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
