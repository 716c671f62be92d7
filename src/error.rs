use std::error::Error;
use std::fmt;

use crate::constants::{INVALID_CREDENTIALS_MESSAGE, TASK_NOT_FOUND_MESSAGE, UNAUTHENTICATED_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusFlowError {
    // Auth errors
    Unauthenticated,
    InvalidCredentials,
    TokenError(String),

    // Authorization errors. Ownership mismatch and absence share one variant.
    NotFoundOrForbidden,

    // Lookup errors outside the ownership guard
    NotFound(String),

    // Registration / profile errors
    Conflict(String),

    // Validation errors
    ValidationError(String),

    // Storage errors
    StorageError(String),

    // System errors
    SystemError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for FocusFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "{}", UNAUTHENTICATED_MESSAGE),
            Self::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS_MESSAGE),
            Self::TokenError(msg) => write!(f, "Token error: {}", msg),
            Self::NotFoundOrForbidden => write!(f, "{}", TASK_NOT_FOUND_MESSAGE),
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::Conflict(msg) => write!(f, "{}", msg),
            Self::ValidationError(msg) => write!(f, "{}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for FocusFlowError {}

impl warp::reject::Reject for FocusFlowError {}

// Generic result type for FocusFlow
pub type Result<T> = std::result::Result<T, FocusFlowError>;
