//! Core library for the task tracker
//!
//! This crate contains the core business logic, including:
//! - Task model and validation rules
//! - Task repository trait and its SQLite / in-memory implementations
//! - Task service with partial-update merge semantics

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
