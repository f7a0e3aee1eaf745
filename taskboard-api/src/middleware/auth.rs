/// Bearer token authentication middleware
///
/// Extracts the `Authorization: Bearer <token>` header, verifies it with the
/// configured [`TokenVerifier`](taskboard_shared::auth::TokenVerifier) and
/// injects an [`AuthContext`] into request extensions.
///
/// Applied per route to mutating endpoints only.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Identity attached to authenticated requests
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Authenticated user; `None` for opaque tokens
    pub user_id: Option<Uuid>,
}

/// Requires a valid bearer token
///
/// # Errors
///
/// - 401 Unauthorized: header missing, not a Bearer token, or token rejected
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let user_id = state.verifier.verify(token).map_err(|e| {
        tracing::debug!(error = %e, mode = state.verifier.mode(), "Rejected bearer token");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(req).await)
}
