//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::{Task, TaskId, TaskStatus};
use crate::Result;

/// Repository interface for task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Get all tasks
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>>;

    /// Find tasks by status
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>>;

    /// Find tasks whose title contains `fragment`, ignoring case
    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Task>>;

    /// Find tasks marked as favorite
    async fn find_favorites(&self) -> Result<Vec<Task>>;

    /// Insert the task when it has no id, otherwise overwrite the stored row.
    ///
    /// Returns the stored task with its id populated. Overwriting a row that
    /// no longer exists fails with `Error::TaskNotFound`.
    async fn save(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID; deleting a missing id is a no-op
    async fn delete_by_id(&self, id: TaskId) -> Result<()>;
}
