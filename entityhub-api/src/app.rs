/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use entityhub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = entityhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    routing::{get, post},
    Router,
};
use entityhub_shared::auth::middleware::session_guard;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; everything
/// inside is cheaply cloneable (pool handle, Arc, reqwest client).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// HTTP client for OAuth provider calls (connection pool, reused)
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    /// Gets the session token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /auth/oauth/                     # Federated sign-in (public,
/// │   ├── GET /google                  #  only when credentials configured)
/// │   ├── GET /google/callback
/// │   ├── GET /github
/// │   └── GET /github/callback
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register           # Public
///     │   └── POST /login              # Public
///     ├── /dashboard                   # Session guard
///     │   └── GET  /
///     └── /entities                    # Session guard
///         ├── GET    /
///         ├── POST   /
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (permissive — the API serves a separate frontend origin)
/// 3. Session guard (per-subrouter, dashboard + entities only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Protected routes: session guard resolves the caller or rejects with 401
    let dashboard_routes = Router::new().route("/", get(routes::dashboard::profile));

    let entity_routes = Router::new()
        .route(
            "/",
            get(routes::entities::list).post(routes::entities::create),
        )
        .route(
            "/:id",
            get(routes::entities::get_one)
                .put(routes::entities::update)
                .delete(routes::entities::remove),
        );

    let protected_routes = Router::new()
        .nest("/dashboard", dashboard_routes)
        .nest("/entities", entity_routes)
        .layer(axum::middleware::from_fn(session_guard(
            state.db.clone(),
            state.jwt_secret().to_string(),
        )));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Federated sign-in. A provider whose credentials are absent gets no
    // routes at all.
    let mut oauth_routes = Router::new();
    if state.config.oauth.google.is_some() {
        oauth_routes = oauth_routes
            .route("/google", get(routes::oauth::google_authorize))
            .route("/google/callback", get(routes::oauth::google_callback));
    }
    if state.config.oauth.github.is_some() {
        oauth_routes = oauth_routes
            .route("/github", get(routes::oauth::github_authorize))
            .route("/github/callback", get(routes::oauth::github_callback));
    }

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .nest("/auth/oauth", oauth_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
