//! SQLite-backed task table.
//!
//! [`TaskStore`] owns the database connection and a commit counter. Every
//! write that changes at least one row bumps the counter once the statement
//! has committed, and every stream handed out by [`TaskStore::observe_all`]
//! re-queries the ordered list when it sees the bump.

use crate::config::StoreConfig;
use crate::entities::todo;
use crate::task::{NewTask, Task};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use migration::MigratorTrait;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tokio::sync::watch;

/// Error type for TaskStore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Endless stream of full, ordered task lists.
pub type TaskStream = BoxStream<'static, Result<Vec<Task>, StoreError>>;

#[derive(Debug)]
pub struct TaskStore {
    db: DatabaseConnection,
    commits: watch::Sender<u64>,
}

impl TaskStore {
    /// Opens the configured database and applies pending migrations.
    #[tracing::instrument]
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.max_connections)
            .sqlx_logging(false);
        let db = Database::connect(options).await?;
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Task database ready at {}", config.database_url);
        Ok(Self::new(db))
    }

    /// Wraps a connection whose schema is already migrated.
    pub fn new(db: DatabaseConnection) -> Self {
        let (commits, _) = watch::channel(0);
        Self { db, commits }
    }

    /// Inserts a new task and returns it with its assigned ID.
    #[tracing::instrument(skip(self))]
    pub async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let active_model = todo::ActiveModel {
            title: ActiveValue::Set(task.title().to_string()),
            is_completed: ActiveValue::Set(task.is_completed()),
            created_at: ActiveValue::Set(task.created_at().timestamp_millis()),
            ..Default::default()
        };
        let created_model = active_model.insert(&self.db).await?;
        self.notify_commit();
        Ok(Task::from(created_model))
    }

    /// Writes the title and completion flag of `task` to the row with the same ID.
    ///
    /// The creation time is never rewritten. An unknown ID is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let result = todo::Entity::update_many()
            .col_expr(todo::Column::Title, Expr::value(task.title()))
            .col_expr(todo::Column::IsCompleted, Expr::value(task.is_completed()))
            .filter(todo::Column::Id.eq(task.id() as i32))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            tracing::warn!("Update skipped: task with ID {} not found", task.id());
            return Ok(());
        }
        self.notify_commit();
        Ok(())
    }

    /// Deletes the row with the same ID as `task`. An unknown ID is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, task: &Task) -> Result<(), StoreError> {
        let result = todo::Entity::delete_by_id(task.id() as i32)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            tracing::warn!("Delete skipped: task with ID {} not found", task.id());
            return Ok(());
        }
        self.notify_commit();
        Ok(())
    }

    /// Deletes every completed task and returns how many were removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_completed(&self) -> Result<u64, StoreError> {
        let result = todo::Entity::delete_many()
            .filter(todo::Column::IsCompleted.eq(true))
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            tracing::debug!("Deleted {} completed tasks", result.rows_affected);
            self.notify_commit();
        }
        Ok(result.rows_affected)
    }

    /// Returns all tasks, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<Task>, StoreError> {
        fetch_all(&self.db).await
    }

    /// Streams the full ordered task list: once immediately, then after every commit.
    ///
    /// Commits that land while a query is in flight are folded into the next
    /// emission. The stream ends when the store is dropped.
    pub fn observe_all(&self) -> TaskStream {
        let db = self.db.clone();
        let commits = self.commits.subscribe();
        stream::unfold(
            (db, commits, true),
            |(db, mut commits, first)| async move {
                if !first && commits.changed().await.is_err() {
                    return None;
                }
                let _ = commits.borrow_and_update();
                let tasks = fetch_all(&db).await;
                Some((tasks, (db, commits, false)))
            },
        )
        .boxed()
    }

    fn notify_commit(&self) {
        self.commits.send_modify(|commit| *commit += 1);
    }
}

async fn fetch_all(db: &DatabaseConnection) -> Result<Vec<Task>, StoreError> {
    let tasks = todo::Entity::find()
        .order_by_desc(todo::Column::CreatedAt)
        .order_by_desc(todo::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Task::from)
        .collect();
    Ok(tasks)
}
