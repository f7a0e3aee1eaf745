/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user (auth)
/// - `GET /v1/users?limit&offset&q&name&email` - List or search active users
/// - `GET /v1/users/:id` - Get user with its status
/// - `DELETE /v1/users/:id` - Delete user (auth)
/// - `POST /v1/users/:id/restore` - Restore soft-deleted user (auth)
/// - `DELETE /v1/users/bulk` - Delete many users (auth)

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
    user::{CreateUser, User, UserRole, UserSearch},
    Pagination,
};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,

    /// Role
    pub role: UserRole,
}

/// List and search parameters
///
/// `q` takes precedence over `name`/`email`.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub q: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ListUsersQuery {
    fn criteria(&self) -> UserSearch {
        if let Some(q) = &self.q {
            return UserSearch::Query(q.clone());
        }
        if self.name.is_some() || self.email.is_some() {
            return UserSearch::Fields {
                name: self.name.clone(),
                email: self.email.clone(),
            };
        }
        UserSearch::All
    }
}

/// Bulk delete request
#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    /// IDs to delete
    #[validate(length(min = 1, message = "No IDs provided"))]
    pub ids: Vec<Uuid>,
}

/// Single user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// User lookup response, including soft-deleted users
#[derive(Debug, Serialize)]
pub struct UserLookupResponse {
    pub user: User,

    /// "active" or "deleted"
    pub status: &'static str,
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Bulk delete response
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// Create user handler
///
/// # Errors
///
/// - 400 Bad Request: invalid email, blank name, unknown role
/// - 409 Conflict: an active user already has this email
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .users
        .create_user(CreateUser {
            email: req.email,
            name: req.name.trim().to_string(),
            role: req.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// List/search users handler
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UsersResponse>> {
    let page = Pagination::clamped(query.limit, query.offset);

    let users = match query.criteria() {
        UserSearch::All => state.users.list_users(page).await?,
        criteria => state.users.search_users(&criteria, page).await?,
    };

    Ok(Json(UsersResponse { users }))
}

/// Get user handler
///
/// Soft-deleted users are returned with `status: "deleted"`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserLookupResponse>> {
    let record = state
        .users
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let status = record.status();
    Ok(Json(UserLookupResponse {
        user: record.into_inner(),
        status,
    }))
}

/// Delete user handler
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.users.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("User"))
    }
}

/// Restore user handler
///
/// # Errors
///
/// - 404 Not Found: user missing, not deleted, or hard deletion configured
/// - 409 Conflict: email now held by another active user
pub async fn restore_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .restore_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Deleted user"))?;

    Ok(Json(UserResponse { user }))
}

/// Bulk delete handler
pub async fn bulk_delete_users(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state.users.bulk_delete_users(&req.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}
