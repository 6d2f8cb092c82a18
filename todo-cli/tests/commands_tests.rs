use std::sync::Arc;
use std::time::Duration;
use todo_cli::{Commands, InputError, execute};
use todo_list::{StoreConfig, StoreRepository, Task, TaskStore, TodoViewModel};

async fn setup() -> anyhow::Result<TodoViewModel<StoreRepository>> {
    let config = StoreConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let store = Arc::new(TaskStore::connect(&config).await?);
    Ok(TodoViewModel::new(Arc::new(StoreRepository::new(store))))
}

async fn wait_for_tasks(
    view_model: &TodoViewModel<StoreRepository>,
    done: impl FnMut(&Vec<Task>) -> bool,
) -> Vec<Task> {
    let mut tasks = view_model.subscribe_tasks();
    tokio::time::timeout(Duration::from_secs(5), async {
        tasks
            .wait_for(done)
            .await
            .map(|list| list.clone())
            .expect("task subscription closed")
    })
    .await
    .expect("timed out waiting for published tasks")
}

#[tokio::test]
async fn list_reports_empty_store() -> anyhow::Result<()> {
    let view_model = setup().await?;

    let output = execute(&view_model, Commands::List).await?;

    assert_eq!(output, "No tasks yet.");
    Ok(())
}

#[tokio::test]
async fn add_then_list_shows_trimmed_title() -> anyhow::Result<()> {
    let view_model = setup().await?;

    let output = execute(
        &view_model,
        Commands::Add {
            title: "  Buy milk ".to_string(),
        },
    )
    .await?;
    assert_eq!(output, "Added \"Buy milk\"");

    let tasks = wait_for_tasks(&view_model, |list| list.len() == 1).await;
    let listed = execute(&view_model, Commands::List).await?;
    assert_eq!(listed, format!("[ ] {:>3}  Buy milk", tasks[0].id()));
    Ok(())
}

#[tokio::test]
async fn blank_titles_are_rejected_before_storing() -> anyhow::Result<()> {
    let view_model = setup().await?;

    let error = execute(
        &view_model,
        Commands::Add {
            title: "   ".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(
        error.downcast_ref::<InputError>(),
        Some(&InputError::BlankTitle)
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(view_model.tasks().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_reported() -> anyhow::Result<()> {
    let view_model = setup().await?;

    let error = execute(&view_model, Commands::Toggle { id: 99 })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "no task with id 99");
    Ok(())
}

#[tokio::test]
async fn toggle_edit_and_clear_completed() -> anyhow::Result<()> {
    let view_model = setup().await?;
    execute(
        &view_model,
        Commands::Add {
            title: "Task A".to_string(),
        },
    )
    .await?;
    let id = wait_for_tasks(&view_model, |list| list.len() == 1).await[0].id();

    let toggled = execute(&view_model, Commands::Toggle { id }).await?;
    assert_eq!(toggled, format!("Marked task {} as done", id));
    wait_for_tasks(&view_model, |list| list[0].is_completed()).await;

    let renamed = execute(
        &view_model,
        Commands::Edit {
            id,
            title: "Task B".to_string(),
        },
    )
    .await?;
    assert_eq!(renamed, format!("Renamed task {} to \"Task B\"", id));
    let edited = wait_for_tasks(&view_model, |list| list[0].title() == "Task B").await;
    assert!(edited[0].is_completed());

    execute(&view_model, Commands::ClearCompleted).await?;
    wait_for_tasks(&view_model, |list| list.is_empty()).await;
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_task() -> anyhow::Result<()> {
    let view_model = setup().await?;
    execute(
        &view_model,
        Commands::Add {
            title: "Walk dog".to_string(),
        },
    )
    .await?;
    let id = wait_for_tasks(&view_model, |list| list.len() == 1).await[0].id();

    let output = execute(&view_model, Commands::Delete { id }).await?;

    assert_eq!(output, format!("Deleted task {}", id));
    wait_for_tasks(&view_model, |list| list.is_empty()).await;
    Ok(())
}
