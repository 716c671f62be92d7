//! Authentication and authorization module

pub mod gate;
pub mod password;
pub mod resolver;
pub mod token;
pub mod user;

// Re-export main components
pub use gate::{with_request_context, AuthenticationGate, GateOutcome, Identity, Principal, RequestContext};
pub use password::{Argon2Comparator, PasswordComparator};
pub use resolver::{ClaimStrategy, IdentityResolver, LegacySubjectStrategy, NumericClaimStrategy};
pub use token::{extract_bearer_token, Claims, TokenManager};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, UserRecord, UserView};
