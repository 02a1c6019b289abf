/// Entity endpoints: scoped CRUD plus query shaping
///
/// All routes sit behind the session guard; every store operation is scoped
/// to the authenticated caller, so a valid id belonging to someone else is
/// answered exactly like a missing one (404 — existence of other users'
/// records must not leak).
///
/// # Endpoints
///
/// - `GET    /api/entities?search=&status=&sortBy=&sortOrder=`
/// - `GET    /api/entities/:id`
/// - `POST   /api/entities`
/// - `PUT    /api/entities/:id`
/// - `DELETE /api/entities/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use entityhub_shared::models::{
    entity::{CreateEntity, Entity, EntityQuery, EntityStatus, UpdateEntity},
    user::PublicUser,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// List query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Case-insensitive substring match against name OR owner label
    pub search: Option<String>,

    /// Status filter; `All` (or absent) disables it
    pub status: Option<String>,

    /// Sort field (default `createdAt`)
    pub sort_by: Option<String>,

    /// `asc` or `desc` (default `desc`)
    pub sort_order: Option<String>,
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntityRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Owner is required"))]
    pub owner: String,

    /// Defaults to Pending when omitted
    pub status: Option<EntityStatus>,
}

/// Update request; omitted fields are preserved
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEntityRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Owner must not be empty"))]
    pub owner: Option<String>,

    pub status: Option<EntityStatus>,
}

#[derive(Debug, Serialize)]
pub struct EntityResponse {
    pub entity: Entity,
}

#[derive(Debug, Serialize)]
pub struct EntityListResponse {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Resolves the `status` parameter: absent and the `All` sentinel both mean
/// "no filter"; anything else must be a real status.
fn resolve_status_filter(status: Option<&str>) -> ApiResult<Option<EntityStatus>> {
    match status {
        None | Some("All") => Ok(None),
        Some(s) => EntityStatus::parse(s)
            .map(Some)
            .ok_or_else(|| ApiError::validation("status", format!("Unknown status '{}'", s))),
    }
}

/// `GET /api/entities` — the caller's entities, shaped by the query
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<EntityListResponse>> {
    let status = resolve_status_filter(params.status.as_deref())?;

    let entities = Entity::list_for_user(
        &state.db,
        user.id,
        &EntityQuery {
            search: params.search,
            status,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        },
    )
    .await?;

    Ok(Json(EntityListResponse { entities }))
}

/// `GET /api/entities/:id`
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EntityResponse>> {
    let entity = Entity::find_for_user(&state.db, user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Entity not found".to_string()))?;

    Ok(Json(EntityResponse { entity }))
}

/// `POST /api/entities`
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    ValidatedJson(req): ValidatedJson<CreateEntityRequest>,
) -> ApiResult<(StatusCode, Json<EntityResponse>)> {
    let entity = Entity::create(
        &state.db,
        user.id,
        CreateEntity {
            name: req.name,
            owner: req.owner,
            status: req.status,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(EntityResponse { entity })))
}

/// `PUT /api/entities/:id` — partial update, owner-scoped
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateEntityRequest>,
) -> ApiResult<Json<EntityResponse>> {
    let entity = Entity::update_for_user(
        &state.db,
        user.id,
        id,
        UpdateEntity {
            name: req.name,
            owner: req.owner,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Entity not found".to_string()))?;

    Ok(Json(EntityResponse { entity }))
}

/// `DELETE /api/entities/:id`
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = Entity::delete_for_user(&state.db, user.id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Entity not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Entity deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_status_filter_sentinel() {
        assert_eq!(resolve_status_filter(None).unwrap(), None);
        assert_eq!(resolve_status_filter(Some("All")).unwrap(), None);
    }

    #[test]
    fn test_resolve_status_filter_known_values() {
        assert_eq!(
            resolve_status_filter(Some("Active")).unwrap(),
            Some(EntityStatus::Active)
        );
        assert_eq!(
            resolve_status_filter(Some("Pending")).unwrap(),
            Some(EntityStatus::Pending)
        );
        assert_eq!(
            resolve_status_filter(Some("Inactive")).unwrap(),
            Some(EntityStatus::Inactive)
        );
    }

    #[test]
    fn test_resolve_status_filter_rejects_unknown() {
        assert!(resolve_status_filter(Some("Bogus")).is_err());
        assert!(resolve_status_filter(Some("active")).is_err());
        assert!(resolve_status_filter(Some("")).is_err());
    }
}
