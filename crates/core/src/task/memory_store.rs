//! In-memory task storage
//!
//! Keeps tasks in a map behind a lock. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Task, TaskId, TaskStatus};
use super::repository::TaskRepository;
use crate::{Error, Result};

struct Inner {
    /// Last id handed out; ids are never reused
    last_id: TaskId,
    tasks: BTreeMap<TaskId, Task>,
}

/// In-memory task store
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                last_id: 0,
                tasks: BTreeMap::new(),
            }),
        }
    }

    async fn filtered(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        Ok(self.filtered(|t| t.status == status).await)
    }

    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Task>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .filtered(|t| t.title.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_favorites(&self) -> Result<Vec<Task>> {
        Ok(self.filtered(|t| t.favorite).await)
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let id = match task.id {
            Some(id) if inner.tasks.contains_key(&id) => id,
            Some(id) => return Err(Error::TaskNotFound(id)),
            None => {
                inner.last_id += 1;
                task.id = Some(inner.last_id);
                inner.last_id
            }
        };
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.tasks.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let store = InMemoryTaskStore::new();

        let first = store.save(Task::new("Task 1")).await.unwrap();
        let second = store.save(Task::new("Task 2")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let store = InMemoryTaskStore::new();
        let mut task = store.save(Task::new("Original")).await.unwrap();

        task.title = "Updated".to_string();
        task.status = TaskStatus::InProgress;
        store.save(task.clone()).await.unwrap();

        let stored = store.find_by_id(task.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.title, "Updated");
        assert_eq!(stored.status, TaskStatus::InProgress);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_unknown_id_fails() {
        let store = InMemoryTaskStore::new();
        let mut task = Task::new("Ghost");
        task.id = Some(42);

        match store.save(task).await.unwrap_err() {
            Error::TaskNotFound(id) => assert_eq!(id, 42),
            e => panic!("Expected TaskNotFound error, got: {:?}", e),
        }
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryTaskStore::new();
        let task = store.save(Task::new("Task 1")).await.unwrap();
        store.delete_by_id(task.id.unwrap()).await.unwrap();

        let next = store.save(Task::new("Task 2")).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn test_queries() {
        let store = InMemoryTaskStore::new();
        store
            .save(Task::new("Write documentation").with_favorite(true))
            .await
            .unwrap();
        store
            .save(Task::new("Write tests").with_status(TaskStatus::InProgress))
            .await
            .unwrap();
        store.save(Task::new("Code review")).await.unwrap();

        assert_eq!(store.find_by_status(TaskStatus::Pending).await.unwrap().len(), 2);
        assert_eq!(store.find_by_title_containing("WRITE").await.unwrap().len(), 2);
        assert_eq!(store.find_by_title_containing("").await.unwrap().len(), 3);
        assert!(store.find_by_title_containing("deploy").await.unwrap().is_empty());

        let favorites = store.find_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].title, "Write documentation");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let store = InMemoryTaskStore::new();
        store.save(Task::new("Écrire la DOCUMENTATION")).await.unwrap();
        store.save(Task::new("Straße bauen")).await.unwrap();

        for fragment in ["écrire", "ÉCRIRE", "documentation"] {
            let found = store.find_by_title_containing(fragment).await.unwrap();
            assert_eq!(found.len(), 1, "fragment {:?}", fragment);
            assert_eq!(found[0].title, "Écrire la DOCUMENTATION");
        }
        assert_eq!(store.find_by_title_containing("STRASSE").await.unwrap().len(), 0);
        assert_eq!(store.find_by_title_containing("STRAßE").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = InMemoryTaskStore::new();
        store.save(Task::new("Keep")).await.unwrap();

        store.delete_by_id(999).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }
}
