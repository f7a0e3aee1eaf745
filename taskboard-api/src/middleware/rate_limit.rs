/// Rate limiting middleware
///
/// Admits each request against a fixed-window policy chosen from the route.
/// Counters are keyed by policy and client, so a burst of reads never eats
/// into the write budget.
///
/// # Policies (per minute)
///
/// | Route | Policy | Max |
/// |---|---|---|
/// | any `GET` | `read` | 100 |
/// | `POST /tasks/:id/comments` | `comment-write` | 30 |
/// | `POST /tasks/:id/notify` | `notify` | 50 |
/// | `DELETE /users/bulk` | `bulk-delete` | 20 |
/// | other mutations | `write` | 50 |
///
/// # Client identity
///
/// The peer address, else `unknown`. The first `X-Forwarded-For` entry is
/// only used when `TRUST_FORWARDED_FOR` is set, since clients can forge it.
///
/// # Headers
///
/// Every limited response carries:
/// - `X-RateLimit-Limit`: Requests allowed per window
/// - `X-RateLimit-Remaining`: Requests left in the window
/// - `X-RateLimit-Reset`: Unix timestamp when the window ends
/// - `Retry-After`: Seconds to wait (429 responses only)

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use taskboard_shared::ratelimit::{Admission, RateLimitPolicy};

/// Picks the policy for a request
pub fn policy_for(method: &Method, path: &str) -> RateLimitPolicy {
    let path = path.trim_end_matches('/');

    if *method == Method::GET {
        RateLimitPolicy::READ
    } else if *method == Method::DELETE && path.ends_with("/users/bulk") {
        RateLimitPolicy::BULK_DELETE
    } else if *method == Method::POST && path.ends_with("/comments") {
        RateLimitPolicy::COMMENT_WRITE
    } else if *method == Method::POST && path.ends_with("/notify") {
        RateLimitPolicy::NOTIFY
    } else {
        RateLimitPolicy::WRITE
    }
}

/// Resolves the client identity for counting
fn client_key(req: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(forwarded) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn insert_headers(headers: &mut HeaderMap, admission: &Admission) {
    headers.insert("X-RateLimit-Limit", HeaderValue::from(admission.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(admission.remaining));
    headers.insert(
        "X-RateLimit-Reset",
        HeaderValue::from(admission.reset_at.timestamp()),
    );
}

/// Rate limiting middleware layer
///
/// # Errors
///
/// - 429 Too Many Requests: window exhausted for this client and policy
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = policy_for(request.method(), request.uri().path());
    let key = client_key(&request, state.config.api.trust_forwarded_for);

    let admission = state.limiter.admit(&key, &policy).await;

    if !admission.allowed {
        let retry_after = admission.retry_after_secs(state.limiter.now());
        tracing::warn!(
            client = %key,
            policy = policy.name,
            retry_after,
            "Rate limit exceeded"
        );

        let mut response = ApiError::RateLimitExceeded {
            retry_after,
            message: format!("Rate limit exceeded. Try again in {} seconds", retry_after),
        }
        .into_response();
        insert_headers(response.headers_mut(), &admission);
        return response;
    }

    let mut response = next.run(request).await;
    insert_headers(response.headers_mut(), &admission);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_share_read_policy() {
        assert_eq!(policy_for(&Method::GET, "/users").name, "read");
        assert_eq!(policy_for(&Method::GET, "/tasks/abc/comments").name, "read");
    }

    #[test]
    fn test_route_specific_policies() {
        assert_eq!(policy_for(&Method::DELETE, "/v1/users/bulk").name, "bulk-delete");
        assert_eq!(policy_for(&Method::DELETE, "/v1/users/abc").name, "write");
        assert_eq!(policy_for(&Method::POST, "/v1/tasks/abc/comments").name, "comment-write");
        assert_eq!(policy_for(&Method::POST, "/v1/tasks/abc/notify").name, "notify");
        assert_eq!(policy_for(&Method::PATCH, "/v1/tasks/abc").name, "write");
        assert_eq!(policy_for(&Method::POST, "/v1/users/").name, "write");
    }

    fn forwarded_request() -> Request {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        let addr: SocketAddr = "198.51.100.4:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        assert_eq!(client_key(&forwarded_request(), false), "198.51.100.4");
    }

    #[test]
    fn test_client_key_uses_forwarded_for_when_trusted() {
        assert_eq!(client_key(&forwarded_request(), true), "203.0.113.7");
    }

    #[test]
    fn test_client_key_falls_back_to_peer_then_unknown() {
        let mut req = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_key(&req, true), "unknown");

        let addr: SocketAddr = "198.51.100.4:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_key(&req, true), "198.51.100.4");
    }
}
