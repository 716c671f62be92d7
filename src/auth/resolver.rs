//! Caller identity resolution from bearer tokens
//!
//! A token names its caller through one of several claims depending on when it was
//! issued. Each way of reading an identity is a [`ClaimStrategy`]; the resolver tries
//! them in order and the first one that yields an id wins.

use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::error::{FocusFlowError, Result};

/// One way of reading a numeric user id out of a token
pub trait ClaimStrategy: Send + Sync {
    /// Returns the id this strategy finds in `token`, or `None` to defer to the next one
    fn resolve(&self, tokens: &TokenManager, token: &str) -> Option<i64>;

    /// Strategy name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Reads the `userId` claim carried by every token issued since the claim was introduced
pub struct NumericClaimStrategy;

impl ClaimStrategy for NumericClaimStrategy {
    fn resolve(&self, tokens: &TokenManager, token: &str) -> Option<i64> {
        tokens.extract_user_id(token)
    }

    fn name(&self) -> &'static str {
        "NUMERIC_CLAIM"
    }
}

/// Legacy path: older deployments put the numeric id directly in the subject.
///
/// Kept separate so it can be dropped once no such tokens can still be unexpired.
pub struct LegacySubjectStrategy;

impl ClaimStrategy for LegacySubjectStrategy {
    fn resolve(&self, tokens: &TokenManager, token: &str) -> Option<i64> {
        let subject = tokens.extract_subject(token).ok()?;
        subject.parse::<i64>().ok()
    }

    fn name(&self) -> &'static str {
        "LEGACY_SUBJECT"
    }
}

/// Ordered chain of claim strategies
pub struct IdentityResolver {
    strategies: Vec<Box<dyn ClaimStrategy>>,
}

impl IdentityResolver {
    /// Resolver reading the numeric claim first, then falling back to the legacy subject
    pub fn new() -> Self {
        Self::without_legacy().add_strategy(Box::new(LegacySubjectStrategy))
    }

    /// Resolver that only trusts the numeric claim
    pub fn without_legacy() -> Self {
        Self {
            strategies: vec![Box::new(NumericClaimStrategy)],
        }
    }

    /// Append a strategy at the end of the chain
    pub fn add_strategy(mut self, strategy: Box<dyn ClaimStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Resolve a raw token into a user id by trying every strategy in order
    pub fn resolve_token(&self, tokens: &TokenManager, token: &str) -> Option<i64> {
        for strategy in &self.strategies {
            if let Some(user_id) = strategy.resolve(tokens, token) {
                log::debug!("Identity resolved with strategy: {}", strategy.name());
                return Some(user_id);
            }
        }
        None
    }

    /// Resolve the value of an `Authorization` header into a user id.
    ///
    /// Performs claim extraction only. Callers authorizing a request must have verified
    /// the token first; [`crate::auth::gate::AuthenticationGate`] does both.
    pub fn resolve(&self, tokens: &TokenManager, auth_header: Option<&str>) -> Result<i64> {
        let token = auth_header
            .and_then(extract_bearer_token)
            .ok_or(FocusFlowError::Unauthenticated)?;

        self.resolve_token(tokens, token)
            .ok_or(FocusFlowError::Unauthenticated)
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}
