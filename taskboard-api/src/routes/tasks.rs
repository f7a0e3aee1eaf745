/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create task (auth)
/// - `GET /v1/tasks?limit&offset` - List tasks
/// - `GET /v1/tasks/:id` - Get task
/// - `PATCH /v1/tasks/:id` - Partially update task (auth)
/// - `GET /v1/tasks/:id/priority` - Derived priority

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{not_blank, ValidatedJson},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{
    task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    Pagination,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    /// Description
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    /// Assigned user; must exist
    pub assignee_id: Uuid,
}

/// Partial task update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub assignee_id: Option<Uuid>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Single task response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// Priority response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityResponse {
    pub task_id: Uuid,
    pub priority: TaskPriority,
}

/// Create task handler
///
/// # Errors
///
/// - 400 Bad Request: blank title or unknown assignee
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = state
        .tasks
        .create_task(CreateTask {
            title: req.title,
            description: req.description,
            assignee_id: req.assignee_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// List tasks handler
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<TasksResponse>> {
    let page = Pagination::clamped(query.limit, query.offset);
    let tasks = state.tasks.list_tasks(page).await?;
    Ok(Json(TasksResponse { tasks }))
}

/// Get task handler
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .tasks
        .get_task_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    Ok(Json(TaskResponse { task }))
}

/// Update task handler
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .tasks
        .update_task(id, req.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    Ok(Json(TaskResponse { task }))
}

/// Task priority handler
pub async fn get_task_priority(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PriorityResponse>> {
    let priority = state
        .tasks
        .get_task_priority(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    Ok(Json(PriorityResponse {
        task_id: id,
        priority,
    }))
}
