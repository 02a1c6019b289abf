/// Federated sign-in endpoints (Google, GitHub)
///
/// Redirect-based authorization-code flow:
///
/// - `GET /auth/oauth/{provider}` — 302 to the provider's consent screen
/// - `GET /auth/oauth/{provider}/callback` — code exchange, user resolution,
///   then 302 back to the frontend with the session token in the URL
///   *fragment* (`/auth/success#token=...`) so it never appears in a query
///   string or server log.
///
/// Any failure inside the callback — provider refused the code, no usable
/// email, store error — is logged and answered with a redirect to the
/// frontend login page, mirroring how a browser-driven flow has no JSON
/// surface to report errors on.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use entityhub_shared::{
    auth::{
        jwt,
        oauth::{OAuthClient, ProviderKind},
        password,
    },
    models::user::User,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;

/// Query parameters the provider sends to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,

    /// Echoed nonce; present but unverified (no server-side session exists
    /// to check it against)
    #[serde(default)]
    #[allow(dead_code)]
    pub state: String,
}

pub async fn google_authorize(State(state): State<AppState>) -> ApiResult<Redirect> {
    authorize(&state, ProviderKind::Google)
}

pub async fn github_authorize(State(state): State<AppState>) -> ApiResult<Redirect> {
    authorize(&state, ProviderKind::GitHub)
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    callback(&state, ProviderKind::Google, &params).await
}

pub async fn github_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    callback(&state, ProviderKind::GitHub, &params).await
}

/// Builds the provider client from configuration
///
/// Routes are only registered for configured providers, so a miss here means
/// the router and the config disagree — treated as an internal error.
fn oauth_client(state: &AppState, kind: ProviderKind) -> ApiResult<OAuthClient> {
    let creds = match kind {
        ProviderKind::Google => state.config.oauth.google.as_ref(),
        ProviderKind::GitHub => state.config.oauth.github.as_ref(),
    }
    .ok_or_else(|| {
        crate::error::ApiError::Internal(format!("Provider {} not configured", kind.as_str()))
    })?;

    Ok(OAuthClient::new(
        kind,
        creds.client_id.clone(),
        creds.client_secret.clone(),
        creds.callback_url.clone(),
        state.http.clone(),
    ))
}

fn authorize(state: &AppState, kind: ProviderKind) -> ApiResult<Redirect> {
    let client = oauth_client(state, kind)?;

    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();

    Ok(Redirect::temporary(&client.authorize_url(&nonce)))
}

async fn callback(state: &AppState, kind: ProviderKind, params: &CallbackParams) -> Redirect {
    match complete_sign_in(state, kind, &params.code).await {
        Ok(token) => Redirect::temporary(&format!(
            "{}/auth/success#token={}",
            state.config.frontend_url, token
        )),
        Err(e) => {
            tracing::warn!(provider = kind.as_str(), "Federated sign-in failed: {}", e);
            Redirect::temporary(&format!("{}/login", state.config.frontend_url))
        }
    }
}

/// Runs the full callback flow: code → profile → user → session token
async fn complete_sign_in(
    state: &AppState,
    kind: ProviderKind,
    code: &str,
) -> ApiResult<String> {
    let client = oauth_client(state, kind)?;
    let profile = client.fetch_profile(code).await?;

    let user = match User::find_by_email(&state.db, &profile.email).await? {
        Some(user) => user,
        None => {
            // First sign-in through this provider: create the account with a
            // random placeholder secret. Hashing is deferred to this branch
            // so returning users skip the Argon2 cost.
            let placeholder_hash = password::hash_password(&password::generate_placeholder())?;
            let (user, created) = User::find_or_create_by_email(
                &state.db,
                &profile.email,
                &profile.name,
                placeholder_hash,
            )
            .await?;

            if created {
                tracing::info!(
                    user_id = %user.id,
                    provider = kind.as_str(),
                    "Created user from federated sign-in"
                );
            }
            user
        }
    };

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;
    Ok(token)
}
