//! Owned task resources

pub mod guard;
pub mod model;
pub mod service;

// Re-export main components
pub use guard::OwnershipGuard;
pub use model::{OwnedResource, Priority, Status, Task, TaskRequest};
pub use service::TaskService;
