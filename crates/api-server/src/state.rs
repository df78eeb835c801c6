//! Application state

use std::sync::Arc;

use tasktrack_core::task::{InMemoryTaskStore, SqliteTaskStore, TaskRepository, TaskService};

use crate::config::{ServerConfig, StoreBackend};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_service: TaskService,
    store: StoreBackend,
}

impl AppState {
    /// Create the state for the configured store backend
    pub async fn new(config: &ServerConfig) -> tasktrack_core::Result<Self> {
        let repository: Arc<dyn TaskRepository> = match config.store {
            StoreBackend::Sqlite => Arc::new(
                SqliteTaskStore::connect(&config.database_url, config.max_connections).await?,
            ),
            StoreBackend::Memory => Arc::new(InMemoryTaskStore::new()),
        };
        Ok(Self::with_repository(repository, config.store))
    }

    /// Create the state around an existing repository
    pub fn with_repository(repository: Arc<dyn TaskRepository>, store: StoreBackend) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                task_service: TaskService::new(repository),
                store,
            }),
        }
    }

    pub fn task_service(&self) -> &TaskService {
        &self.inner.task_service
    }

    pub fn store(&self) -> StoreBackend {
        self.inner.store
    }
}
