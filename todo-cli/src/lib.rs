use clap::Subcommand;
use todo_list::{Task, TaskRepository, TodoViewModel};

/// Input the command line refuses before it reaches the view model.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("title cannot be blank")]
    BlankTitle,
    #[error("no task with id {0}")]
    UnknownTask(u32),
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Add a new task
    Add { title: String },
    /// Change the title of a task
    Edit { id: u32, title: String },
    /// Mark a task as done, or as open again
    Toggle { id: u32 },
    /// Delete a task
    Delete { id: u32 },
    /// Delete every completed task
    ClearCompleted,
    /// Show all tasks, newest first
    List,
}

/// Returns the trimmed title, or an error if nothing is left after trimming.
pub fn validate_title(input: &str) -> Result<&str, InputError> {
    let title = input.trim();
    if title.is_empty() {
        return Err(InputError::BlankTitle);
    }
    Ok(title)
}

/// Renders tasks one per line in the order given.
pub fn render(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.".to_string();
    }
    tasks
        .iter()
        .map(|task| {
            let mark = if task.is_completed() { "x" } else { " " };
            format!("[{}] {:>3}  {}", mark, task.id(), task.title())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs one command against the view model and returns the text to print.
///
/// Mutations are awaited because the process exits right after.
pub async fn execute<R: TaskRepository + 'static>(
    view_model: &TodoViewModel<R>,
    command: Commands,
) -> anyhow::Result<String> {
    view_model.wait_until_loaded().await?;

    match command {
        Commands::Add { title } => {
            let title = validate_title(&title)?;
            view_model.add(title).wait().await?;
            Ok(format!("Added \"{}\"", title))
        }
        Commands::Edit { id, title } => {
            let title = validate_title(&title)?;
            let task = find_task(view_model, id)?;
            view_model.edit(&task, title).wait().await?;
            Ok(format!("Renamed task {} to \"{}\"", id, title))
        }
        Commands::Toggle { id } => {
            let task = find_task(view_model, id)?;
            view_model.toggle_completion(&task).wait().await?;
            let state = if task.is_completed() { "open" } else { "done" };
            Ok(format!("Marked task {} as {}", id, state))
        }
        Commands::Delete { id } => {
            let task = find_task(view_model, id)?;
            view_model.delete(&task).wait().await?;
            Ok(format!("Deleted task {}", id))
        }
        Commands::ClearCompleted => {
            view_model.delete_completed().wait().await?;
            Ok("Cleared completed tasks".to_string())
        }
        Commands::List => Ok(render(&view_model.tasks())),
    }
}

fn find_task<R: TaskRepository + 'static>(
    view_model: &TodoViewModel<R>,
    id: u32,
) -> Result<Task, InputError> {
    view_model
        .tasks()
        .into_iter()
        .find(|task| task.id() == id)
        .ok_or(InputError::UnknownTask(id))
}
