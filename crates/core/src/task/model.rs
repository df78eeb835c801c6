//! Task model definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Store-assigned task identity
pub type TaskId = i64;

/// Task status
///
/// There is no transition graph: any status may be replaced by any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    /// Strict parse: only the exact canonical tokens are accepted.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unsupported status '{}' (expected one of {})",
                    value,
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

/// A tracked task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `None` until the task has been persisted
    pub id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub favorite: bool,
}

impl Task {
    /// Create an unsaved task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            favorite: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the favorite flag
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }
}

/// Candidate for task creation
///
/// `status` stays unset until the service applies its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub favorite: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }
}

/// Partial update for an existing task
///
/// `None` means "leave the stored value alone". Absent and explicit null
/// are not distinguished, so a description cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub favorite: Option<bool>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task() {
        let task = Task::new("Title").with_description("Description");
        assert!(task.id.is_none());
        assert_eq!(task.title, "Title");
        assert_eq!(task.description, Some("Description".to_string()));
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.favorite);
    }

    #[test]
    fn test_task_builders() {
        let task = Task::new("Title")
            .with_status(TaskStatus::Completed)
            .with_favorite(true);
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.favorite);
    }

    #[test]
    fn test_new_task_defaults() {
        let candidate = NewTask::new("Title");
        assert!(candidate.status.is_none());
        assert!(candidate.description.is_none());
        assert!(!candidate.favorite);
    }

    #[test]
    fn test_status_parse_is_strict() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }

        for token in ["pending", "In_Progress", "DONE", "", " PENDING"] {
            match token.parse::<TaskStatus>() {
                Err(Error::InvalidInput(msg)) => assert!(msg.contains("Unsupported status")),
                other => panic!("Expected InvalidInput for {:?}, got: {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_status_serde_uses_canonical_tokens() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let parsed: TaskStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, TaskStatus::Cancelled);

        assert!(serde_json::from_str::<TaskStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn test_task_serializes_all_fields() {
        let mut task = Task::new("Write docs").with_favorite(true);
        task.id = Some(7);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "Write docs");
        assert!(value["description"].is_null());
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["favorite"], true);
    }
}
