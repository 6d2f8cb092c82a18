use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use todo_list::TaskStore;

pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Each in-memory SQLite connection is its own database, so keep exactly one.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_store() -> anyhow::Result<TaskStore> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = setup_db().await?;
    Ok(TaskStore::new(db))
}
