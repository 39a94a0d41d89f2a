//! In-memory task store (non-persistent).
//!
//! Mirrors the collaborator's observable behavior: ids are assigned
//! monotonically, reads are owner-scoped, and a mutation matching zero rows
//! is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, Task, TaskStore};
use crate::auth::Owner;

#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    tasks: HashMap<i64, Task>,
    next_id: i64,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self, owner: &Owner) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.user_id == owner.user_id())
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tasks)
    }

    async fn create(&self, owner: &Owner, title: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let task = Task {
            id: inner.next_id,
            user_id: owner.user_id(),
            title: title.to_string(),
            completed: false,
            created_at: Some(Utc::now().to_rfc3339()),
        };
        inner.tasks.insert(task.id, task);
        Ok(())
    }

    async fn set_completed(
        &self,
        owner: &Owner,
        id: i64,
        completed: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(task) = inner
            .tasks
            .get_mut(&id)
            .filter(|t| t.user_id == owner.user_id())
        {
            task.completed = completed;
        }
        Ok(())
    }

    async fn remove(&self, owner: &Owner, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .tasks
            .get(&id)
            .is_some_and(|t| t.user_id == owner.user_id());
        if owned {
            inner.tasks.remove(&id);
        }
        Ok(())
    }
}
