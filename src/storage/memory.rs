//! In-memory storage implementation for development and testing
//!
//! Keeps all records in memory behind async locks. Suitable for development,
//! testing, or single-instance deployments; data is lost on restart.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::*;
use crate::auth::user::UserRecord;
use crate::error::{FocusFlowError, Result};
use crate::tasks::model::{Priority, Status, Task};

/// In-memory credential storage
pub struct MemoryCredentialStore {
    users: Arc<RwLock<BTreeMap<i64, UserRecord>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    async fn generate_id(&self) -> i64 {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn save(&self, mut user: UserRecord) -> Result<UserRecord> {
        let id = match user.id {
            Some(id) => id,
            None => self.generate_id().await,
        };
        user.id = Some(id);

        let mut users = self.users.write().await;
        // Username and email stay unique even under concurrent registrations
        if users
            .values()
            .any(|u| u.id != Some(id) && (u.username == user.username || u.email == user.email))
        {
            return Err(FocusFlowError::Conflict(
                "Username or email is already in use!".to_string(),
            ));
        }
        users.insert(id, user.clone());
        Ok(user)
    }
}

/// In-memory task storage
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<BTreeMap<i64, Task>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    async fn generate_id(&self) -> i64 {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    async fn filter_owned<F>(&self, user_id: i64, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        let tasks = self.tasks.read().await;
        tasks
            .values()
            .filter(|t| t.user_id == user_id && predicate(t))
            .cloned()
            .collect()
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore<Task> for MemoryTaskStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        let id = match task.id {
            Some(id) => id,
            None => self.generate_id().await,
        };
        task.id = Some(id);
        self.tasks.write().await.insert(id, task.clone());
        Ok(task)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        match self.tasks.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(FocusFlowError::NotFound(format!("Task {} not found", id))),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Task>> {
        Ok(self.filter_owned(user_id, |_| true).await)
    }

    async fn find_by_user_id_and_status(&self, user_id: i64, status: Status) -> Result<Vec<Task>> {
        Ok(self.filter_owned(user_id, |t| t.status == status).await)
    }

    async fn find_by_user_id_and_priority(
        &self,
        user_id: i64,
        priority: Priority,
    ) -> Result<Vec<Task>> {
        Ok(self.filter_owned(user_id, |t| t.priority == priority).await)
    }

    async fn find_overdue_by_user_id(&self, user_id: i64, now: NaiveDateTime) -> Result<Vec<Task>> {
        Ok(self.filter_owned(user_id, |t| t.is_overdue(now)).await)
    }

    async fn find_by_user_id_and_due_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        Ok(self
            .filter_owned(user_id, |t| {
                t.due_date.map_or(false, |due| due >= start && due <= end)
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::model::TaskRequest;

    fn task(owner: i64, title: &str) -> Task {
        Task::new(
            TaskRequest {
                title: title.to_string(),
                description: None,
                priority: Priority::Low,
                status: Status::Todo,
                due_date: None,
            },
            owner,
        )
    }

    #[tokio::test]
    async fn test_task_ids_are_assigned() {
        let store = MemoryTaskStore::new();
        let a = store.save(task(1, "a")).await.unwrap();
        let b = store.save(task(1, "b")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));

        store.delete_by_id(1).await.unwrap();
        assert!(store.find_by_id(1).await.unwrap().is_none());
        assert!(store.delete_by_id(1).await.is_err());
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_owner() {
        let store = MemoryTaskStore::new();
        store.save(task(1, "mine")).await.unwrap();
        store.save(task(2, "theirs")).await.unwrap();

        let mine = store.find_by_user_id(1).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
    }

    #[tokio::test]
    async fn test_credential_store_rejects_duplicates() {
        let store = MemoryCredentialStore::new();
        let alice = UserRecord::new("alice".into(), "alice@example.com".into(), "h".into());
        let saved = store.save(alice.clone()).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert!(store.exists_by_username("alice").await.unwrap());
        assert!(store.exists_by_email("alice@example.com").await.unwrap());

        let clash = UserRecord::new("alice".into(), "other@example.com".into(), "h".into());
        assert!(matches!(store.save(clash).await, Err(FocusFlowError::Conflict(_))));

        // Updating the same record is not a clash
        let mut updated = saved.clone();
        updated.email = "new@example.com".into();
        store.save(updated).await.unwrap();
        assert_eq!(store.count().await, 1);
    }
}
