//! Local to-do list core: a SQLite task table, a repository over it, and a
//! view model that keeps an observable task list in sync with the table.

pub mod config;
pub mod entities;
pub mod repository;
pub mod store;
pub mod task;
pub mod view_model;

pub use config::StoreConfig;
pub use repository::{StoreRepository, TaskRepository};
pub use store::{StoreError, TaskStore, TaskStream};
pub use task::{NewTask, Task};
pub use view_model::{Pending, TodoViewModel, ViewModelError};
