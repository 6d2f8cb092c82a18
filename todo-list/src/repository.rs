use crate::store::{StoreError, TaskStore, TaskStream};
use crate::task::{NewTask, Task};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of task data for the view model.
///
/// Implementations expose the ordered task list as a stream and accept
/// mutations; they do no caching or validation of their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned ID.
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Overwrites the stored task with the same ID.
    async fn update(&self, task: Task) -> Result<(), StoreError>;

    /// Removes the stored task with the same ID.
    async fn delete(&self, task: Task) -> Result<(), StoreError>;

    /// Removes every completed task, returning how many were removed.
    async fn delete_completed(&self) -> Result<u64, StoreError>;

    /// Streams the full ordered list, re-emitting after every change.
    fn observe_all(&self) -> TaskStream;
}

/// Repository that forwards everything to a shared [`TaskStore`].
#[derive(Debug, Clone)]
pub struct StoreRepository {
    store: Arc<TaskStore>,
}

impl StoreRepository {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for StoreRepository {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        self.store.insert(task).await
    }

    async fn update(&self, task: Task) -> Result<(), StoreError> {
        self.store.update(&task).await
    }

    async fn delete(&self, task: Task) -> Result<(), StoreError> {
        self.store.delete(&task).await
    }

    async fn delete_completed(&self) -> Result<u64, StoreError> {
        self.store.delete_completed().await
    }

    fn observe_all(&self) -> TaskStream {
        self.store.observe_all()
    }
}
