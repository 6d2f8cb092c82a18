//! UI-facing state for the task list.
//!
//! [`TodoViewModel`] subscribes to its repository when it is created and
//! republishes every emitted list on a watch channel. Presentation code reads
//! snapshots or subscribes, and calls the mutation methods, which run in the
//! background and hand back a [`Pending`] handle.

use crate::repository::TaskRepository;
use crate::store::{StoreError, TaskStream};
use crate::task::{NewTask, Task};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Error type for TodoViewModel operations.
#[derive(Debug, thiserror::Error)]
pub enum ViewModelError {
    /// The repository rejected the mutation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The background mutation panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
    /// The task subscription ended before publishing anything.
    #[error("Task subscription closed")]
    Closed,
}

/// Completion handle of a mutation running in the background.
///
/// Dropping it does not cancel the mutation.
#[derive(Debug)]
pub struct Pending(JoinHandle<Result<(), StoreError>>);

impl Pending {
    /// Waits for the mutation to finish.
    pub async fn wait(self) -> Result<(), ViewModelError> {
        Ok(self.0.await??)
    }
}

pub struct TodoViewModel<R: TaskRepository + 'static> {
    repository: Arc<R>,
    tasks: watch::Receiver<Vec<Task>>,
    loaded: watch::Receiver<bool>,
    dark_theme: watch::Sender<bool>,
    subscription: JoinHandle<()>,
}

impl<R: TaskRepository + 'static> TodoViewModel<R> {
    /// Creates the view model and starts collecting the repository's task stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(repository: Arc<R>) -> Self {
        let (tasks_tx, tasks) = watch::channel(Vec::new());
        let (loaded_tx, loaded) = watch::channel(false);
        let (dark_theme, _) = watch::channel(false);
        let subscription = tokio::spawn(collect_tasks(
            repository.observe_all(),
            tasks_tx,
            loaded_tx,
        ));
        Self {
            repository,
            tasks,
            loaded,
            dark_theme,
            subscription,
        }
    }

    /// Returns the most recently published task list.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    /// Returns a receiver that observes every published task list.
    pub fn subscribe_tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.clone()
    }

    /// Waits until the first list from the repository has been published.
    pub async fn wait_until_loaded(&self) -> Result<(), ViewModelError> {
        let mut loaded = self.loaded.clone();
        loaded
            .wait_for(|loaded| *loaded)
            .await
            .map_err(|_| ViewModelError::Closed)?;
        Ok(())
    }

    pub fn is_dark_theme(&self) -> bool {
        *self.dark_theme.borrow()
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<bool> {
        self.dark_theme.subscribe()
    }

    /// Flips the theme flag. The flag lives only as long as this view model.
    pub fn toggle_theme(&self) {
        self.dark_theme.send_modify(|dark| *dark = !*dark);
    }

    /// Adds a task with the trimmed `title`.
    ///
    /// Blank titles must be rejected by the caller.
    pub fn add(&self, title: &str) -> Pending {
        let task = NewTask::new(title.trim());
        let repository = Arc::clone(&self.repository);
        launch("add", async move { repository.insert(task).await.map(|_| ()) })
    }

    /// Renames `task`, keeping its ID, creation time and completion flag.
    pub fn edit(&self, task: &Task, new_title: &str) -> Pending {
        let updated = task.with_title(new_title.trim());
        let repository = Arc::clone(&self.repository);
        launch("edit", async move { repository.update(updated).await })
    }

    pub fn toggle_completion(&self, task: &Task) -> Pending {
        let updated = task.with_completion_toggled();
        let repository = Arc::clone(&self.repository);
        launch("toggle_completion", async move {
            repository.update(updated).await
        })
    }

    pub fn delete(&self, task: &Task) -> Pending {
        let task = task.clone();
        let repository = Arc::clone(&self.repository);
        launch("delete", async move { repository.delete(task).await })
    }

    pub fn delete_completed(&self) -> Pending {
        let repository = Arc::clone(&self.repository);
        launch("delete_completed", async move {
            repository.delete_completed().await.map(|_| ())
        })
    }
}

impl<R: TaskRepository + 'static> Drop for TodoViewModel<R> {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}

fn launch<F>(action: &'static str, mutation: F) -> Pending
where
    F: Future<Output = Result<(), StoreError>> + Send + 'static,
{
    Pending(tokio::spawn(async move {
        let result = mutation.await;
        if let Err(e) = &result {
            tracing::error!("Task mutation '{}' failed: {}", action, e);
        }
        result
    }))
}

async fn collect_tasks(
    mut stream: TaskStream,
    tasks: watch::Sender<Vec<Task>>,
    loaded: watch::Sender<bool>,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(list) => {
                tracing::debug!("Publishing {} tasks", list.len());
                tasks.send_replace(list);
                loaded.send_replace(true);
            }
            Err(e) => tracing::error!("Failed to refresh tasks: {}", e),
        }
    }
    tracing::debug!("Task stream ended");
}
