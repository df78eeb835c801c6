//! Task module
//!
//! This module contains task-related types and logic.

mod memory_store;
mod model;
mod repository;
mod service;
mod sqlite_store;
mod validation;

pub use memory_store::InMemoryTaskStore;
pub use model::*;
pub use repository::TaskRepository;
pub use service::TaskService;
pub use sqlite_store::SqliteTaskStore;
pub use validation::{
    validate_new_task, validate_patch, FieldError, ValidationError, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
