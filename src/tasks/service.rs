//! Task operations scoped to the calling identity

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::auth::gate::Identity;
use crate::error::{FocusFlowError, Result};
use crate::storage::traits::{ResourceStore, TaskStore};
use crate::tasks::guard::OwnershipGuard;
use crate::tasks::model::{Priority, Status, Task, TaskRequest};

/// Task service.
///
/// Every operation takes the caller's [`Identity`]; there is no entry point that can
/// reach the store without one.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    guard: OwnershipGuard<Task, dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let guard = OwnershipGuard::new(store.clone(), "task");
        Self { store, guard }
    }

    /// All tasks owned by the caller, optionally filtered by status and/or priority
    pub async fn list(
        &self,
        identity: Identity,
        status: Option<Status>,
        priority: Option<Priority>,
    ) -> Result<Vec<Task>> {
        let user_id = identity.user_id();
        match (status, priority) {
            (Some(status), Some(priority)) => {
                let mut tasks = self.store.find_by_user_id_and_status(user_id, status).await?;
                tasks.retain(|t| t.priority == priority);
                Ok(tasks)
            }
            (Some(status), None) => self.store.find_by_user_id_and_status(user_id, status).await,
            (None, Some(priority)) => {
                self.store
                    .find_by_user_id_and_priority(user_id, priority)
                    .await
            }
            (None, None) => self.store.find_by_user_id(user_id).await,
        }
    }

    pub async fn get(&self, identity: Identity, id: i64) -> Result<Task> {
        self.guard.authorize(identity, id).await
    }

    /// Create a task owned by the caller
    pub async fn create(&self, identity: Identity, request: TaskRequest) -> Result<Task> {
        request.validate()?;
        let task = self.store.save(Task::new(request, identity.user_id())).await?;
        log::info!(
            "Task {:?} created for user {}",
            task.id,
            identity.user_id()
        );
        Ok(task)
    }

    pub async fn update(&self, identity: Identity, id: i64, request: TaskRequest) -> Result<Task> {
        request.validate()?;
        let mut task = self.guard.authorize(identity, id).await?;
        task.apply(request);
        self.store.save(task).await
    }

    pub async fn delete(&self, identity: Identity, id: i64) -> Result<()> {
        self.guard.authorize(identity, id).await?;
        match self.store.delete_by_id(id).await {
            // Deleted concurrently between the check and the delete
            Err(FocusFlowError::NotFound(_)) => Err(FocusFlowError::NotFoundOrForbidden),
            other => other,
        }
    }

    pub async fn by_status(&self, identity: Identity, status: Status) -> Result<Vec<Task>> {
        self.store
            .find_by_user_id_and_status(identity.user_id(), status)
            .await
    }

    /// Caller's tasks due before `now` that are not done
    pub async fn overdue(&self, identity: Identity, now: NaiveDateTime) -> Result<Vec<Task>> {
        self.store
            .find_overdue_by_user_id(identity.user_id(), now)
            .await
    }

    /// Caller's tasks due within `[start, end]`
    pub async fn by_due_range(
        &self,
        identity: Identity,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        if start > end {
            return Err(FocusFlowError::ValidationError(
                "Range start must not be after its end".to_string(),
            ));
        }
        self.store
            .find_by_user_id_and_due_range(identity.user_id(), start, end)
            .await
    }
}
