//! FocusFlow - stateless user-identity and task services
//!
//! The user service registers accounts and issues signed bearer tokens. The task
//! service never looks up users: every request is authorized from the token alone,
//! and every task operation is scoped to the identity the token resolves to.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;
pub mod tasks;
pub mod users;

// Re-export main components
pub use config::{ServiceConfig, ServiceKind};
pub use error::{FocusFlowError, Result};
