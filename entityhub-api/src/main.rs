//! # EntityHub API Server
//!
//! HTTP API for EntityHub: user registration and login (local plus Google
//! and GitHub OAuth), stateless JWT sessions, and per-user entity management
//! with search, filter, and sort.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p entityhub-api
//! ```

use entityhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use entityhub_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entityhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "EntityHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // An unreachable database is fatal: exit instead of serving degraded
    // traffic.
    let pool = match create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    run_migrations(&pool).await?;

    if config.oauth.google.is_none() {
        tracing::info!("Google OAuth credentials absent, provider disabled");
    }
    if config.oauth.github.is_none() {
        tracing::info!("GitHub OAuth credentials absent, provider disabled");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
