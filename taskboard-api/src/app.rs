/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::{
///     clock::SystemClock, notifications::transport::LogTransport, store::memory::MemoryStore,
/// };
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(
///     config,
///     Arc::new(MemoryStore::new()),
///     Arc::new(SystemClock),
///     Arc::new(LogTransport),
/// );
///
/// let app = build_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::require_auth, rate_limit::rate_limit_layer},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::{
    auth::TokenVerifier,
    clock::SharedClock,
    notifications::{transport::NotificationTransport, NotificationDispatcher},
    ratelimit::RateLimiter,
    services::{CommentService, TaskService, UserService},
    store::SharedStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is an `Arc`, so cloning is cheap and all handlers share the
/// same limiter counters and notification history.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Persistence gateway
    pub store: SharedStore,

    /// Time source
    pub clock: SharedClock,

    pub users: Arc<UserService>,
    pub tasks: Arc<TaskService>,
    pub comments: Arc<CommentService>,
    pub notifier: Arc<NotificationDispatcher>,

    /// Request admission counters
    pub limiter: Arc<RateLimiter>,

    /// Bearer token verification
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Wires services around a store, clock and notification transport
    pub fn new(
        config: Config,
        store: SharedStore,
        clock: SharedClock,
        transport: Arc<dyn NotificationTransport>,
    ) -> Self {
        let notifier = Arc::new(NotificationDispatcher::new(transport, clock.clone()));

        Self {
            users: Arc::new(UserService::new(
                store.clone(),
                clock.clone(),
                config.deletion_policy,
            )),
            tasks: Arc::new(TaskService::new(store.clone(), clock.clone(), notifier.clone())),
            comments: Arc::new(CommentService::new(store.clone(), clock.clone())),
            notifier,
            limiter: Arc::new(RateLimiter::new(clock.clone())),
            verifier: Arc::new(config.auth.verifier()),
            config: Arc::new(config),
            store,
            clock,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                         # Health check (public, unlimited)
/// └── /v1/
///     ├── /users
///     │   ├── GET    /                # List or search
///     │   ├── POST   /                # Create (auth)
///     │   ├── DELETE /bulk            # Bulk delete (auth)
///     │   ├── GET    /:id             # Lookup
///     │   ├── DELETE /:id             # Delete (auth)
///     │   └── POST   /:id/restore     # Restore (auth)
///     └── /tasks
///         ├── GET    /                # List
///         ├── POST   /                # Create (auth)
///         ├── GET    /:id             # Lookup
///         ├── PATCH  /:id             # Update (auth)
///         ├── GET    /:id/priority
///         ├── GET    /:id/comments
///         ├── POST   /:id/comments
///         ├── GET    /:id/notifications
///         └── POST   /:id/notify      # Manual notification (auth)
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. CORS (tower-http CorsLayer)
/// 2. Logging (tower-http TraceLayer)
/// 3. Rate limiting (all `/v1` routes)
/// 4. Authentication (mutating routes)
/// 5. Body validation (inside handlers via `ValidatedJson`)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{comments, health, notifications, tasks, users};

    let auth = axum::middleware::from_fn_with_state(state.clone(), require_auth);

    let v1_routes = Router::new()
        .route(
            "/users",
            get(users::list_users).merge(post(users::create_user).layer(auth.clone())),
        )
        .route(
            "/users/bulk",
            delete(users::bulk_delete_users).layer(auth.clone()),
        )
        .route(
            "/users/:id",
            get(users::get_user).merge(delete(users::delete_user).layer(auth.clone())),
        )
        .route(
            "/users/:id/restore",
            post(users::restore_user).layer(auth.clone()),
        )
        .route(
            "/tasks",
            get(tasks::list_tasks).merge(post(tasks::create_task).layer(auth.clone())),
        )
        .route(
            "/tasks/:id",
            get(tasks::get_task).merge(patch(tasks::update_task).layer(auth.clone())),
        )
        .route("/tasks/:id/priority", get(tasks::get_task_priority))
        .route(
            "/tasks/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/tasks/:id/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/tasks/:id/notify",
            post(notifications::notify_assignee).layer(auth),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([
                header::RETRY_AFTER,
                header::HeaderName::from_static("x-ratelimit-limit"),
                header::HeaderName::from_static("x-ratelimit-remaining"),
                header::HeaderName::from_static("x-ratelimit-reset"),
            ])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
