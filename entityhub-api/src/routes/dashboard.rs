/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard
/// Authorization: Bearer <token>
/// ```
///
/// Returns the caller's own profile. The session guard has already resolved
/// the user (password hash excluded), so this handler only echoes it back.

use axum::{Extension, Json};
use entityhub_shared::models::user::PublicUser;
use serde::Serialize;

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// The authenticated caller's public profile
    pub user: PublicUser,
}

pub async fn profile(Extension(user): Extension<PublicUser>) -> Json<DashboardResponse> {
    Json(DashboardResponse { user })
}
