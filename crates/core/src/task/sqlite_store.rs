//! SQLite task storage
//!
//! Tasks live in a single `tasks` table. The schema is created on connect
//! when missing. Status is stored as its canonical text token.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;

use super::model::{Task, TaskId, TaskStatus};
use super::repository::TaskRepository;
use crate::{Error, Result};

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT,
    status      TEXT    NOT NULL DEFAULT 'PENDING',
    favorite    INTEGER NOT NULL DEFAULT 0
)";

const CREATE_STATUS_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: String,
    favorite: bool,
}

impl TryFrom<TaskRow> for Task {
    type Error = Error;

    fn try_from(row: TaskRow) -> Result<Self> {
        let status = TaskStatus::from_str(&row.status).map_err(|_| {
            Error::Storage(format!(
                "Task {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(Self {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            status,
            favorite: row.favorite,
        })
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>> {
    rows.into_iter().map(Task::try_from).collect()
}

/// SQLite-backed task store
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Connect using a URL such as `sqlite://tasks.db?mode=rwc` or
    /// `sqlite::memory:`.
    ///
    /// An in-memory database is private to its connection, so the pool is
    /// pinned to a single long-lived connection in that case.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options.connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Open (creating if needed) a database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if missing
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_TASKS_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_STATUS_INDEX).execute(&pool).await?;
        debug!("Task schema ready");
        Ok(Self { pool })
    }

    async fn insert(&self, task: Task) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, description, status, favorite) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING id, title, description, status, favorite",
        )
        .bind(task.title)
        .bind(task.description)
        .bind(task.status.as_str())
        .bind(task.favorite)
        .fetch_one(&self.pool)
        .await?;
        Task::try_from(row)
    }

    async fn update(&self, id: TaskId, task: Task) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET title = ?1, description = ?2, status = ?3, favorite = ?4 \
             WHERE id = ?5 \
             RETURNING id, title, description, status, favorite",
        )
        .bind(task.title)
        .bind(task.description)
        .bind(task.status.as_str())
        .bind(task.favorite)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(Error::TaskNotFound(id)).and_then(Task::try_from)
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskStore {
    async fn find_all(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, favorite FROM tasks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        into_tasks(rows)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, favorite FROM tasks WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, favorite FROM tasks \
             WHERE status = ?1 ORDER BY id",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        into_tasks(rows)
    }

    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Task>> {
        // Folded in Rust: SQLite's lower() only handles ASCII
        let needle = fragment.to_lowercase();
        let tasks = self.find_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect())
    }

    async fn find_favorites(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, status, favorite FROM tasks \
             WHERE favorite = 1 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        into_tasks(rows)
    }

    async fn save(&self, task: Task) -> Result<Task> {
        match task.id {
            Some(id) => self.update(id, task).await,
            None => self.insert(task).await,
        }
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
