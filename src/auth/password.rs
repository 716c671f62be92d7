//! One-way credential hashing and comparison

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::{FocusFlowError, Result};

/// Opaque one-way credential comparator
pub trait PasswordComparator: Send + Sync {
    /// Hash a plaintext password into a storable digest
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Check a plaintext password against a stored digest
    fn matches(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id comparator producing PHC-format digests
#[derive(Default)]
pub struct Argon2Comparator {
    argon2: Argon2<'static>,
}

impl Argon2Comparator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordComparator for Argon2Comparator {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| FocusFlowError::SystemError(format!("Password hashing failed: {}", e)))
    }

    fn matches(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
