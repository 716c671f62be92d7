use std::collections::HashSet;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::{BEARER_PREFIX, DEFAULT_TOKEN_TTL_HOURS};
use crate::error::{FocusFlowError, Result};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Numeric user id. Tokens issued before this claim existed do not carry it.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Issued at (as UTC timestamp)
    pub iat: u64,
    /// Expiration time (as UTC timestamp)
    pub exp: u64,
}

impl Claims {
    /// Creates claims for a user, valid for `ttl` from now
    pub fn new(username: String, user_id: Option<i64>, ttl: Duration) -> Self {
        let now = unix_now();
        Self {
            sub: username,
            user_id,
            iat: now,
            exp: now + ttl.as_secs(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        unix_now() > self.exp
    }
}

/// Claims read without signature or expiry checks. Every field is optional so that
/// a malformed claim never masks the others.
#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    sub: Option<String>,
    #[serde(rename = "userId", default)]
    user_id: Option<serde_json::Value>,
}

/// Wire shape checked during verification. `userId` stays untyped here: a claim of the
/// wrong type makes the id absent, not the token invalid.
#[derive(Debug, Deserialize)]
struct SignedClaims {
    sub: String,
    #[serde(rename = "userId", default)]
    user_id: Option<serde_json::Value>,
    iat: u64,
    exp: u64,
}

/// Integer claim, or integer-valued string. Anything else is absent.
fn user_id_from_claim(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Issues and verifies HS256 session tokens.
///
/// Both services build one from the same secret; nothing else is shared between them.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and the default token lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 3600))
    }

    /// Creates a new token manager with a custom token lifetime
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no grace period past `exp`
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Lifetime given to newly issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `username` carrying the numeric `user_id` claim
    pub fn issue(&self, username: &str, user_id: i64) -> Result<String> {
        let claims = Claims::new(username.to_string(), Some(user_id), self.ttl);
        self.generate_token(&claims)
    }

    /// Signs arbitrary claims with the shared secret
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| FocusFlowError::TokenError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature integrity and expiry. Malformed input is simply invalid.
    pub fn verify(&self, token: &str) -> bool {
        match self.decode_verified(token) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Token verification failed: {}", e);
                false
            }
        }
    }

    /// Validates and decodes a token, failing on bad signature, structure or expiry
    pub fn decode_verified(&self, token: &str) -> Result<Claims> {
        let signed = decode::<SignedClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| FocusFlowError::TokenError(format!("Invalid token: {}", e)))?
            .claims;

        let claims = Claims {
            sub: signed.sub,
            user_id: signed.user_id.as_ref().and_then(user_id_from_claim),
            iat: signed.iat,
            exp: signed.exp,
        };
        if claims.is_expired() {
            return Err(FocusFlowError::TokenError("Token expired".to_string()));
        }

        Ok(claims)
    }

    /// Decodes the subject without checking signature or expiry.
    ///
    /// Only meant for diagnostics and claim extraction; authorization must pair it with
    /// [`TokenManager::verify`].
    pub fn extract_subject(&self, token: &str) -> Result<String> {
        self.decode_unverified(token)?
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| FocusFlowError::TokenError("Token has no subject".to_string()))
    }

    /// Decodes the numeric user id claim without checking signature or expiry.
    ///
    /// Returns `None` when the claim is missing (tokens issued before it existed) or is
    /// not an integer.
    pub fn extract_user_id(&self, token: &str) -> Option<i64> {
        let claims = self.decode_unverified(token).ok()?;
        claims.user_id.as_ref().and_then(user_id_from_claim)
    }

    fn decode_unverified(&self, token: &str) -> Result<UnverifiedClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        decode::<UnverifiedClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| FocusFlowError::TokenError(format!("Malformed token: {}", e)))
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-signing-key-with-enough-length-42";

    fn expired_claims(user_id: Option<i64>) -> Claims {
        let now = unix_now();
        Claims {
            sub: "alice".to_string(),
            user_id,
            iat: now - 7200,
            exp: now - 3600,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let manager = TokenManager::new(SECRET);
        let token = manager.issue("alice", 7).unwrap();

        assert!(manager.verify(&token));
        assert_eq!(manager.extract_user_id(&token), Some(7));
        assert_eq!(manager.extract_subject(&token).unwrap(), "alice");

        let claims = manager.decode_verified(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let manager = TokenManager::new(SECRET);
        let token = manager.generate_token(&expired_claims(Some(7))).unwrap();

        assert!(!manager.verify(&token));
        // Claims remain readable for diagnostics
        assert_eq!(manager.extract_subject(&token).unwrap(), "alice");
        assert_eq!(manager.extract_user_id(&token), Some(7));
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let manager = TokenManager::new(SECRET);
        let token = manager.issue("alice", 7).unwrap();
        let other = manager.issue("mallory", 8).unwrap();

        // Splice another token's payload under the original signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert!(!manager.verify(&spliced));

        // Flip a character in the middle of the signature
        let mut signature: Vec<char> = parts[2].chars().collect();
        signature[10] = if signature[10] == 'A' { 'B' } else { 'A' };
        let flipped = format!("{}.{}.{}", parts[0], parts[1], signature.into_iter().collect::<String>());
        assert!(!manager.verify(&flipped));
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let issuer = TokenManager::new("another-signing-key-with-enough-length-99");
        let verifier = TokenManager::new(SECRET);
        let token = issuer.issue("alice", 7).unwrap();
        assert!(!verifier.verify(&token));
    }

    #[test]
    fn test_malformed_token_does_not_panic() {
        let manager = TokenManager::new(SECRET);
        for input in ["", "invalid", "invalid.token.here", "a.b", "...."] {
            assert!(!manager.verify(input));
            assert!(manager.extract_subject(input).is_err());
            assert_eq!(manager.extract_user_id(input), None);
        }
    }

    #[test]
    fn test_legacy_token_has_no_user_id() {
        let manager = TokenManager::new(SECRET);
        let claims = Claims::new("42".to_string(), None, manager.ttl());
        let token = manager.generate_token(&claims).unwrap();

        assert!(manager.verify(&token));
        assert_eq!(manager.extract_user_id(&token), None);
        assert_eq!(manager.extract_subject(&token).unwrap(), "42");
    }

    fn token_with_user_id(manager: &TokenManager, user_id: serde_json::Value) -> String {
        let now = unix_now();
        let payload = serde_json::json!({
            "sub": "alice",
            "userId": user_id,
            "iat": now,
            "exp": now + 3600,
        });
        encode(&Header::new(Algorithm::HS256), &payload, &manager.encoding_key).unwrap()
    }

    #[test]
    fn test_non_integer_user_id_is_absent_not_invalid() {
        let manager = TokenManager::new(SECRET);

        let string_id = token_with_user_id(&manager, serde_json::json!("7"));
        assert!(manager.verify(&string_id));
        assert_eq!(manager.decode_verified(&string_id).unwrap().user_id, Some(7));
        assert_eq!(manager.extract_user_id(&string_id), Some(7));

        for value in [serde_json::json!("abc"), serde_json::json!(7.5), serde_json::json!(true)] {
            let token = token_with_user_id(&manager, value);
            assert!(manager.verify(&token));
            assert_eq!(manager.decode_verified(&token).unwrap().user_id, None);
            assert_eq!(manager.extract_user_id(&token), None);
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("bearer abc"), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }
}
