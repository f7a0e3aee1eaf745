/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks/:id/notifications` - Notification history, newest first
/// - `POST /v1/tasks/:id/notify` - Send a message to the assignee (auth)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{not_blank, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::{notification::Notification, task::Task};
use uuid::Uuid;
use validator::Validate;

/// Manual notification request
#[derive(Debug, Deserialize, Validate)]
pub struct NotifyRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 1000, message = "Message must be at most 1000 characters")
    )]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

async fn find_task(state: &AppState, task_id: Uuid) -> ApiResult<Task> {
    state
        .tasks
        .get_task_by_id(task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))
}

/// Notification history handler
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<NotificationsResponse>> {
    let task = find_task(&state, task_id).await?;

    let notifications = state.notifier.history(task.id).await;
    Ok(Json(NotificationsResponse { notifications }))
}

/// Manual notification handler
pub async fn notify_assignee(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<NotifyRequest>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    let task = find_task(&state, task_id).await?;

    let notification = state
        .notifier
        .notify_assignee(&task, req.message.trim())
        .await;

    Ok((StatusCode::CREATED, Json(NotificationResponse { notification })))
}
