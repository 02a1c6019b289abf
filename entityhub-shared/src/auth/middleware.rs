/// Session guard middleware for Axum
///
/// Gates every protected route. Per request the guard walks a fixed chain —
/// header present → Bearer format → signature/expiry/issuer valid → user
/// still exists — and any failed step short-circuits with a 401. On success
/// the resolved [`PublicUser`] (password hash excluded) is inserted into the
/// request extensions for handlers to extract.
///
/// The guard performs exactly one Credential Store lookup and has no other
/// side effects.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use entityhub_shared::auth::middleware::session_guard;
/// use entityhub_shared::models::user::PublicUser;
/// use sqlx::PgPool;
///
/// async fn protected(Extension(user): Extension<PublicUser>) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn router(pool: PgPool) -> Router {
///     Router::new()
///         .route("/protected", get(protected))
///         .layer(middleware::from_fn(session_guard(pool, "jwt-secret")))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{PublicUser, User};

/// Error type for the session guard
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token validation failed (signature, expiry, issuer)
    InvalidToken(String),

    /// Token was valid but its subject no longer resolves to a user
    UnknownUser,

    /// Credential Store lookup failed
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every authentication failure is a 401; only a store failure is a
        // 500, and its detail stays server-side.
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "No token provided".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::UnknownUser => (StatusCode::UNAUTHORIZED, "User not found".to_string()),
            AuthError::DatabaseError(msg) => {
                tracing::error!("Session guard store lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error = if status == StatusCode::UNAUTHORIZED {
            "unauthorized"
        } else {
            "internal_error"
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

/// Validates the request's session token and resolves the caller
///
/// On success the resolved [`PublicUser`] is added to the request
/// extensions.
///
/// # Errors
///
/// Returns 401 Unauthorized if the authorization header is missing or
/// malformed, the token fails validation, the token has expired, or the
/// embedded user id no longer exists.
pub async fn require_session(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    req.extensions_mut().insert(PublicUser::from(user));

    Ok(next.run(req).await)
}

/// Creates a session guard middleware closure
///
/// Captures the pool and JWT secret so the guard can be layered with
/// `axum::middleware::from_fn`.
pub fn session_guard(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(require_session(pool, secret, req, next))
    }
}
