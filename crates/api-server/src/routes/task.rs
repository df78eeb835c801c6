//! Task API endpoints
//!
//! RESTful API for task CRUD operations, filtering and search.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use tasktrack_core::task::{
    validate_new_task, validate_patch, FieldError, NewTask, Task, TaskId, TaskPatch, TaskStatus,
};
use tasktrack_core::Error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub favorite: Option<bool>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            favorite: req.favorite.unwrap_or(false),
        }
    }
}

/// Partial update; omitted and null fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub favorite: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            favorite: req.favorite,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub favorite: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            favorite: task.favorite,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            details: Vec::new(),
        }),
    )
}

fn not_found(id: TaskId) -> ApiError {
    error_response(StatusCode::NOT_FOUND, format!("Task {} not found", id))
}

/// Map a core error to a response; store failures are logged, not exposed
fn service_error(err: Error) -> ApiError {
    match err {
        Error::Validation(validation) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                details: validation.errors,
            }),
        ),
        Error::TaskNotFound(id) => not_found(id),
        e if e.is_client_error() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        e => {
            error!(error = %e, "Task store failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn task_id(path: Result<Path<TaskId>, PathRejection>) -> ApiResult<TaskId> {
    path.map(|Path(id)| id)
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
}

fn task_list(tasks: Vec<Task>) -> Json<Vec<TaskResponse>> {
    Json(tasks.into_iter().map(TaskResponse::from).collect())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List all tasks
async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service().list().await.map_err(service_error)?;
    Ok(task_list(tasks))
}

/// GET /api/tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let id = task_id(path)?;
    let task = state.task_service().get(id).await.map_err(service_error)?;

    match task {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// GET /api/tasks/status/{status} - List tasks with the given status
async fn list_tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let status = status.parse::<TaskStatus>().map_err(service_error)?;
    let tasks = state
        .task_service()
        .list_by_status(status)
        .await
        .map_err(service_error)?;
    Ok(task_list(tasks))
}

/// GET /api/tasks/search?title= - Case-insensitive title search
async fn search_tasks(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let tasks = state
        .task_service()
        .search(&query.title)
        .await
        .map_err(service_error)?;
    Ok(task_list(tasks))
}

/// GET /api/tasks/favorites - List favorite tasks
async fn list_favorite_tasks(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service()
        .list_favorites()
        .await
        .map_err(service_error)?;
    Ok(task_list(tasks))
}

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let candidate = NewTask::from(json_body(payload)?);
    validate_new_task(&candidate).map_err(|e| service_error(e.into()))?;

    let created = state
        .task_service()
        .create(candidate)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// PUT /api/tasks/{id} - Merge the provided fields into a task
async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let id = task_id(path)?;
    let patch = TaskPatch::from(json_body(payload)?);
    validate_patch(&patch).map_err(|e| service_error(e.into()))?;

    let updated = state
        .task_service()
        .update(id, patch)
        .await
        .map_err(service_error)?;

    match updated {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// PATCH /api/tasks/{id}/favorite - Flip the favorite flag
async fn toggle_favorite(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let id = task_id(path)?;
    let toggled = state
        .task_service()
        .toggle_favorite(id)
        .await
        .map_err(service_error)?;

    match toggled {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// DELETE /api/tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = task_id(path)?;
    let deleted = state
        .task_service()
        .delete(id)
        .await
        .map_err(service_error)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/favorites", get(list_favorite_tasks))
        .route("/api/tasks/search", get(search_tasks))
        .route("/api/tasks/status/{status}", get(list_tasks_by_status))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/favorite", patch(toggle_favorite))
}
