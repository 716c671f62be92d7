//! Per-request authentication gate
//!
//! The gate verifies the bearer token at most once per request and publishes the
//! resolved [`Principal`] into a [`RequestContext`] that is passed explicitly to the
//! handlers. It never rejects a request itself: anonymous and rejected requests carry an
//! empty context, and the handlers' own checks decide.

use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use warp::Filter;

use crate::auth::resolver::IdentityResolver;
use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::error::{FocusFlowError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

/// Resolved caller identity for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Numeric user id, if any claim strategy could resolve one
    pub user_id: Option<i64>,
    /// Token subject
    pub username: String,
}

/// Numeric identity of an authenticated caller.
///
/// Only obtainable from a verified [`RequestContext`], so every operation taking one has
/// passed the authentication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(i64);

impl Identity {
    pub fn user_id(&self) -> i64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn trusted(user_id: i64) -> Self {
        Self(user_id)
    }
}

/// Result of inspecting one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No `Authorization` header, or not a bearer token
    NoToken,
    /// Token verified and principal resolved
    Verified(Principal),
    /// Token present but failed verification
    Rejected,
}

/// Request-scoped authentication context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The caller's numeric identity, or `Unauthenticated`
    pub fn require_identity(&self) -> Result<Identity> {
        self.principal
            .as_ref()
            .and_then(|p| p.user_id)
            .map(Identity)
            .ok_or(FocusFlowError::Unauthenticated)
    }

    /// The caller's username, or `Unauthenticated`
    pub fn require_username(&self) -> Result<&str> {
        self.principal
            .as_ref()
            .map(|p| p.username.as_str())
            .ok_or(FocusFlowError::Unauthenticated)
    }
}

impl From<GateOutcome> for RequestContext {
    fn from(outcome: GateOutcome) -> Self {
        match outcome {
            GateOutcome::Verified(principal) => RequestContext::authenticated(principal),
            GateOutcome::NoToken | GateOutcome::Rejected => RequestContext::anonymous(),
        }
    }
}

/// Verifies tokens and resolves principals. Holds only immutable state.
pub struct AuthenticationGate {
    tokens: Arc<TokenManager>,
    resolver: IdentityResolver,
}

impl AuthenticationGate {
    pub fn new(tokens: Arc<TokenManager>, resolver: IdentityResolver) -> Self {
        Self { tokens, resolver }
    }

    /// Inspect the raw `Authorization` header value of a request
    pub fn inspect(&self, auth_header: Option<&str>) -> GateOutcome {
        let token = match auth_header.and_then(extract_bearer_token) {
            Some(token) => token,
            None => return GateOutcome::NoToken,
        };

        if !self.tokens.verify(token) {
            log_security_event(&SecurityEvent::TokenValidationFailed {
                subject: self.tokens.extract_subject(token).ok(),
            });
            return GateOutcome::Rejected;
        }

        let username = match self.tokens.extract_subject(token) {
            Ok(username) => username,
            Err(e) => {
                log::debug!("Verified token carries no usable subject: {}", e);
                return GateOutcome::Rejected;
            }
        };
        let user_id = self.resolver.resolve_token(&self.tokens, token);

        log::debug!("Authenticated request for user {} (id {:?})", username, user_id);
        GateOutcome::Verified(Principal { user_id, username })
    }

    /// Inspect a request and turn the outcome into its context
    pub fn context_for(&self, auth_header: Option<&str>) -> RequestContext {
        self.inspect(auth_header).into()
    }
}

/// Warp filter extracting the request context from the `Authorization` header
pub fn with_request_context(
    gate: Arc<AuthenticationGate>,
) -> impl Filter<Extract = (RequestContext,), Error = Infallible> + Clone {
    warp::header::optional::<String>("authorization")
        .or(warp::any().map(|| None::<String>))
        .unify()
        .map(move |header: Option<String>| gate.context_for(header.as_deref()))
}
