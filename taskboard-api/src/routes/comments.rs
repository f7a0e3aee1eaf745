/// Comment endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks/:id/comments` - List a task's comments, oldest first
/// - `POST /v1/tasks/:id/comments` - Add a comment
///
/// Both return 404 when the task does not exist.

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
use taskboard_shared::models::comment::{Comment, CreateComment};
use uuid::Uuid;
use validator::Validate;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub author_id: Uuid,

    #[validate(
        custom(function = "not_blank"),
        length(max = 5000, message = "Comment must be at most 5000 characters")
    )]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

async fn ensure_task(state: &AppState, task_id: Uuid) -> ApiResult<()> {
    match state.tasks.get_task_by_id(task_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Task")),
    }
}

/// List comments handler
pub async fn list_comments(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<CommentsResponse>> {
    ensure_task(&state, task_id).await?;

    let comments = state.comments.list_comments_by_task(task_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// Create comment handler
pub async fn create_comment(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    ensure_task(&state, task_id).await?;

    let comment = state
        .comments
        .create_comment(
            task_id,
            CreateComment {
                author_id: req.author_id,
                body: req.body,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}
