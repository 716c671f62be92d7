//! Abstract storage interfaces for pluggable backends
//!
//! The services only consume these traits. Implementations are expected to provide
//! their own concurrency control; single-record operations must be atomic.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::auth::user::UserRecord;
use crate::error::Result;
use crate::tasks::model::{OwnedResource, Priority, Status, Task};

/// Credential storage interface
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Insert or update a user, assigning an id on first save
    async fn save(&self, user: UserRecord) -> Result<UserRecord>;
}

/// Storage for resources keyed by an opaque numeric id
#[async_trait]
pub trait ResourceStore<R: OwnedResource>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<R>>;

    /// Insert or update a resource, assigning an id on first save
    async fn save(&self, resource: R) -> Result<R>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// Task storage interface. Every listing is scoped to one owner.
#[async_trait]
pub trait TaskStore: ResourceStore<Task> {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Task>>;

    async fn find_by_user_id_and_status(&self, user_id: i64, status: Status) -> Result<Vec<Task>>;

    async fn find_by_user_id_and_priority(
        &self,
        user_id: i64,
        priority: Priority,
    ) -> Result<Vec<Task>>;

    /// Tasks due before `now` that are not done
    async fn find_overdue_by_user_id(&self, user_id: i64, now: NaiveDateTime) -> Result<Vec<Task>>;

    /// Tasks due between `start` and `end`, inclusive
    async fn find_by_user_id_and_due_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>>;
}
