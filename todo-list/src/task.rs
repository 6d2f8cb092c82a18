use crate::entities::todo;
use chrono::{DateTime, Utc};

/// A to-do record as stored in the task table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Task {
    id: u32,
    title: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: u32, title: String, is_completed: bool, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            is_completed,
            created_at,
        }
    }

    /// Returns the store-assigned ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the task has been completed.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns a copy of this task carrying `title` instead.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this task with the completion flag flipped.
    pub fn with_completion_toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

impl From<todo::Model> for Task {
    fn from(model: todo::Model) -> Self {
        Task::new(
            model.id as u32,
            model.title,
            model.is_completed,
            DateTime::<Utc>::from_timestamp_millis(model.created_at).unwrap_or_default(),
        )
    }
}

/// A task that has not been stored yet and therefore has no ID.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewTask {
    title: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates an open task stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self::at(title, Utc::now())
    }

    /// Creates an open task with an explicit creation time.
    pub fn at(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            is_completed: false,
            created_at,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(
            7,
            "Buy milk".to_string(),
            false,
            DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        )
    }

    #[test]
    fn with_title_keeps_identity_and_state() {
        let task = sample().with_completion_toggled();

        let renamed = task.with_title("Buy oat milk");

        assert_eq!(renamed.title(), "Buy oat milk");
        assert_eq!(renamed.id(), task.id());
        assert_eq!(renamed.created_at(), task.created_at());
        assert!(renamed.is_completed());
    }

    #[test]
    fn toggling_twice_restores_completion() {
        let task = sample();

        let twice = task.with_completion_toggled().with_completion_toggled();

        assert_eq!(twice, task);
    }

    #[test]
    fn new_task_starts_open() {
        let before = Utc::now();
        let task = NewTask::new("Walk dog");

        assert_eq!(task.title(), "Walk dog");
        assert!(!task.is_completed());
        assert!(task.created_at() >= before);
    }

    #[test]
    fn model_conversion_reads_millisecond_timestamps() {
        let model = todo::Model {
            id: 3,
            title: "Task A".to_string(),
            is_completed: true,
            created_at: 1_700_000_000_123,
        };

        let task = Task::from(model);

        assert_eq!(task.id(), 3);
        assert_eq!(task.title(), "Task A");
        assert!(task.is_completed());
        assert_eq!(task.created_at().timestamp_millis(), 1_700_000_000_123);
    }
}
