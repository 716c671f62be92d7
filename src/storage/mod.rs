//! Storage collaborators for credentials and owned resources

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::{MemoryCredentialStore, MemoryTaskStore};
pub use traits::{CredentialStore, ResourceStore, TaskStore};
