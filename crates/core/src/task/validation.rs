//! Field constraints checked at the request boundary
//!
//! The service assumes its input already passed these checks.

use serde::Serialize;
use thiserror::Error;

use super::model::{NewTask, TaskPatch};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All violations found in one request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "must not be blank"));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(FieldError::new(
            "title",
            format!("must be at most {} characters", TITLE_MAX_CHARS),
        ));
    }
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push(FieldError::new(
            "description",
            format!("must be at most {} characters", DESCRIPTION_MAX_CHARS),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

/// Validate a creation candidate
pub fn validate_new_task(candidate: &NewTask) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_title(&candidate.title, &mut errors);
    if let Some(description) = &candidate.description {
        check_description(description, &mut errors);
    }
    finish(errors)
}

/// Validate the provided fields of a patch
pub fn validate_patch(patch: &TaskPatch) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if let Some(title) = &patch.title {
        check_title(title, &mut errors);
    }
    if let Some(description) = &patch.description {
        check_description(description, &mut errors);
    }
    finish(errors)
}
