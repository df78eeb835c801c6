//! Task service
//!
//! Business rules between the request surface and the repository: creation
//! defaults, field-by-field patch merging, and the existence check that gates
//! every id-based mutation. A missing task is reported as `Ok(None)` or
//! `Ok(false)`; only store failures surface as `Err`.

use std::sync::Arc;

use tracing::{debug, info};

use super::model::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use super::repository::TaskRepository;
use crate::Result;

/// Stateless task service over a shared repository
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// All tasks, in the store's default order
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        self.repository.find_by_status(status).await
    }

    /// Case-insensitive substring search on the title
    pub async fn search(&self, fragment: &str) -> Result<Vec<Task>> {
        self.repository.find_by_title_containing(fragment).await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Task>> {
        self.repository.find_favorites().await
    }

    /// Persist a new task, defaulting an unset status to `Pending`
    pub async fn create(&self, candidate: NewTask) -> Result<Task> {
        let status = candidate.status.unwrap_or_else(|| {
            debug!("No status given, defaulting to {}", TaskStatus::default());
            TaskStatus::default()
        });
        let task = Task {
            id: None,
            title: candidate.title,
            description: candidate.description,
            status,
            favorite: candidate.favorite,
        };

        let created = self.repository.save(task).await?;
        info!(task_id = ?created.id, status = %created.status, "Task created");
        Ok(created)
    }

    /// Merge `patch` into the stored task. Never creates a task.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            debug!(task_id = id, "Update skipped, task not found");
            return Ok(None);
        };

        apply_patch(&mut task, patch);

        let updated = self.repository.save(task).await?;
        info!(task_id = id, status = %updated.status, "Task updated");
        Ok(Some(updated))
    }

    pub async fn toggle_favorite(&self, id: TaskId) -> Result<Option<Task>> {
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            debug!(task_id = id, "Favorite toggle skipped, task not found");
            return Ok(None);
        };

        task.favorite = !task.favorite;

        let updated = self.repository.save(task).await?;
        info!(task_id = id, favorite = updated.favorite, "Task favorite toggled");
        Ok(Some(updated))
    }

    /// Returns `false` when there was nothing to delete
    pub async fn delete(&self, id: TaskId) -> Result<bool> {
        if self.repository.find_by_id(id).await?.is_none() {
            debug!(task_id = id, "Delete skipped, task not found");
            return Ok(false);
        }

        self.repository.delete_by_id(id).await?;
        info!(task_id = id, "Task deleted");
        Ok(true)
    }
}

/// Overwrite each field the patch provides; leave the rest untouched
fn apply_patch(task: &mut Task, patch: TaskPatch) {
    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = Some(description);
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(favorite) = patch.favorite {
        task.favorite = favorite;
    }
}
