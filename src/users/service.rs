//! Registration, login and profile management

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::auth::password::PasswordComparator;
use crate::auth::token::TokenManager;
use crate::auth::user::{
    validate_email, validate_password, LoginRequest, LoginResponse, RegisterRequest, UserRecord,
    UserView,
};
use crate::error::{FocusFlowError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::CredentialStore;

// Compared against when the username is unknown
const DUMMY_PASSWORD: &str = "focusflow-dummy-credential";

pub struct UserService {
    store: Arc<dyn CredentialStore>,
    passwords: Arc<dyn PasswordComparator>,
    tokens: Arc<TokenManager>,
    min_auth_duration: Duration,
    dummy_digest: OnceLock<Option<String>>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: Arc<dyn PasswordComparator>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
            min_auth_duration: Duration::ZERO,
            dummy_digest: OnceLock::new(),
        }
    }

    /// Hold every login attempt to at least `duration`
    pub fn with_min_auth_duration(mut self, duration: Duration) -> Self {
        self.min_auth_duration = duration;
        self
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserRecord> {
        request.validate()?;
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();

        if self.store.exists_by_username(&username).await? {
            return Err(self.conflict(&username, "Username is already taken!"));
        }
        if self.store.exists_by_email(&email).await? {
            return Err(self.conflict(&username, "Email is already in use!"));
        }

        let digest = self.passwords.hash(&request.password)?;
        let user = self
            .store
            .save(UserRecord::new(username, email, digest))
            .await?;

        log::info!("Registered user {} (id {:?})", user.username, user.id);
        Ok(user)
    }

    /// Exchange credentials for a token.
    ///
    /// Unknown username and wrong password fail identically, in wording and in timing.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let timer = AuthTimer::new(self.min_auth_duration);
        let result = self.check_credentials(&request).await;
        timer.wait().await;

        let user = match result {
            Ok(user) => user,
            Err(FocusFlowError::InvalidCredentials) => {
                log_security_event(&SecurityEvent::LoginFailed {
                    username: request.username.trim().to_string(),
                });
                return Err(FocusFlowError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let user_id = user
            .id
            .ok_or_else(|| FocusFlowError::StorageError("Stored user has no id".to_string()))?;
        let token = self.tokens.issue(&user.username, user_id)?;

        log_security_event(&SecurityEvent::LoginSucceeded {
            username: user.username.clone(),
            user_id,
        });

        Ok(LoginResponse {
            token,
            username: user.username,
            email: user.email,
        })
    }

    /// Both failure paths run exactly one password comparison
    async fn check_credentials(&self, request: &LoginRequest) -> Result<UserRecord> {
        match self.store.find_by_username(request.username.trim()).await? {
            Some(user) if self.passwords.matches(&request.password, &user.password_hash) => {
                Ok(user)
            }
            Some(_) => Err(FocusFlowError::InvalidCredentials),
            None => {
                if let Some(digest) = self.dummy_digest() {
                    let _ = self.passwords.matches(&request.password, digest);
                }
                Err(FocusFlowError::InvalidCredentials)
            }
        }
    }

    fn dummy_digest(&self) -> Option<&str> {
        self.dummy_digest
            .get_or_init(|| match self.passwords.hash(DUMMY_PASSWORD) {
                Ok(digest) => Some(digest),
                Err(e) => {
                    log::error!("Failed to prepare dummy credential digest: {}", e);
                    None
                }
            })
            .as_deref()
    }

    pub async fn profile(&self, username: &str) -> Result<UserView> {
        self.find(username).await.map(|user| user.view())
    }

    pub async fn update_email(&self, username: &str, new_email: &str) -> Result<UserView> {
        validate_email(new_email)?;
        let new_email = new_email.trim();
        let mut user = self.find(username).await?;

        if let Some(existing) = self.store.find_by_email(new_email).await? {
            if existing.username != username {
                return Err(FocusFlowError::Conflict("Email is already in use".to_string()));
            }
        }

        user.email = new_email.to_string();
        let saved = self.store.save(user).await?;
        Ok(saved.view())
    }

    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        validate_password(new_password)?;
        let mut user = self.find(username).await?;

        if !self.passwords.matches(old_password, &user.password_hash) {
            log_security_event(&SecurityEvent::PasswordChangeRejected {
                username: username.to_string(),
            });
            return Err(FocusFlowError::ValidationError(
                "Old password is incorrect".to_string(),
            ));
        }

        user.password_hash = self.passwords.hash(new_password)?;
        self.store.save(user).await?;
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<UserRecord> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| FocusFlowError::NotFound("User not found".to_string()))
    }

    fn conflict(&self, username: &str, reason: &str) -> FocusFlowError {
        log_security_event(&SecurityEvent::RegistrationConflict {
            username: username.to_string(),
            reason: reason.to_string(),
        });
        FocusFlowError::Conflict(reason.to_string())
    }
}
