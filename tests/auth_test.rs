use std::time::Duration;

use focusflow::auth::{
    AuthenticationGate, Claims, GateOutcome, IdentityResolver, Principal, TokenManager,
};
use focusflow::error::FocusFlowError;

mod common;
use common::{bearer, token_manager, SIGNING_KEY};

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

fn legacy_token(tokens: &TokenManager, subject: &str) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        user_id: None,
        iat: now(),
        exp: now() + 3600,
    };
    tokens.generate_token(&claims).unwrap()
}

#[test]
fn test_issued_token_properties() {
    let tokens = TokenManager::with_ttl(SIGNING_KEY, Duration::from_secs(2 * 3600));
    let token = tokens.issue("alice", 42).unwrap();

    assert!(tokens.verify(&token));
    let claims = tokens.decode_verified(&token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.user_id, Some(42));
    assert_eq!(claims.exp - claims.iat, 2 * 3600);

    assert_eq!(tokens.extract_subject(&token).unwrap(), "alice");
    assert_eq!(tokens.extract_user_id(&token), Some(42));
}

#[test]
fn test_foreign_secret_is_rejected() {
    let ours = token_manager();
    let theirs = TokenManager::new("some-other-deployment-signing-key-0099");
    let token = theirs.issue("mallory", 1).unwrap();

    assert!(!ours.verify(&token));
    // Claims stay readable without verification
    assert_eq!(ours.extract_subject(&token).unwrap(), "mallory");
}

#[test]
fn test_expired_token_is_rejected() {
    let tokens = token_manager();
    let claims = Claims {
        sub: "alice".to_string(),
        user_id: Some(1),
        iat: now() - 7200,
        exp: now() - 3600,
    };
    let token = tokens.generate_token(&claims).unwrap();

    assert!(claims.is_expired());
    assert!(!tokens.verify(&token));
}

#[test]
fn test_legacy_subject_resolution() {
    let tokens = token_manager();
    let legacy = legacy_token(&tokens, "42");

    let resolver = IdentityResolver::new();
    assert_eq!(resolver.resolve_token(&tokens, &legacy), Some(42));

    let strict = IdentityResolver::without_legacy();
    assert_eq!(strict.resolve_token(&tokens, &legacy), None);

    // Numeric claim wins over a numeric-looking subject
    let modern = tokens
        .generate_token(&Claims::new("7".to_string(), Some(99), Duration::from_secs(60)))
        .unwrap();
    assert_eq!(resolver.resolve_token(&tokens, &modern), Some(99));
}

#[test]
fn test_resolve_from_header() {
    let tokens = token_manager();
    let resolver = IdentityResolver::new();
    let token = tokens.issue("alice", 5).unwrap();

    assert_eq!(resolver.resolve(&tokens, Some(&bearer(&token))), Ok(5));
    assert_eq!(resolver.resolve(&tokens, None), Err(FocusFlowError::Unauthenticated));
    assert_eq!(
        resolver.resolve(&tokens, Some("Bearer not.a.token")),
        Err(FocusFlowError::Unauthenticated)
    );
}

#[test]
fn test_gate_outcomes() {
    let tokens = token_manager();
    let gate = AuthenticationGate::new(tokens.clone(), IdentityResolver::new());

    let token = tokens.issue("alice", 3).unwrap();
    assert_eq!(
        gate.inspect(Some(&bearer(&token))),
        GateOutcome::Verified(Principal {
            user_id: Some(3),
            username: "alice".to_string(),
        })
    );

    assert_eq!(gate.inspect(None), GateOutcome::NoToken);
    assert_eq!(gate.inspect(Some("Bearer garbage")), GateOutcome::Rejected);

    // Verified subject that resolves to no numeric identity
    let named = legacy_token(&tokens, "alice");
    let ctx = gate.context_for(Some(&bearer(&named)));
    assert!(ctx.principal().is_some());
    assert_eq!(ctx.require_identity(), Err(FocusFlowError::Unauthenticated));
    assert_eq!(ctx.require_username(), Ok("alice"));
}
