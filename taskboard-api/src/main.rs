//! # Taskboard API Server
//!
//! JSON API for users, tasks and comments with per-client rate limiting,
//! bearer authentication and task notifications.
//!
//! Storage is PostgreSQL when `DATABASE_URL` is set and process memory
//! otherwise.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    clock::{SharedClock, SystemClock},
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig as PoolConfig},
    },
    notifications::transport::{LogTransport, NotificationTransport, WebhookTransport},
    store::{memory::MemoryStore, postgres::PgStore, SharedStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired rate-limit counters are dropped
const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store: SharedStore = match &config.database {
        Some(db) => {
            let pool = create_pool(PoolConfig {
                url: db.url.clone(),
                max_connections: db.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let transport: Arc<dyn NotificationTransport> = match &config.notifications.webhook_url {
        Some(url) => Arc::new(WebhookTransport::new(url.clone())?),
        None => Arc::new(LogTransport),
    };
    tracing::info!(
        transport = transport.name(),
        auth = config.auth.verifier().mode(),
        deletion_policy = ?config.deletion_policy,
        "Configured"
    );

    let clock: SharedClock = Arc::new(SystemClock);
    let bind_address = config.bind_address();
    let state = AppState::new(config, store, clock, transport);

    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired rate-limit counters");
            }
        }
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received, exiting...");
}
