/// Entity model and database operations
///
/// Entities are the business records users manage from the dashboard. Every
/// entity is owned by exactly one user, and every operation here is scoped by
/// `user_id` — a caller can never observe another user's rows, whatever id
/// they supply. "Not found" and "not owned" are deliberately the same answer.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE entity_status AS ENUM ('active', 'pending', 'inactive');
///
/// CREATE TABLE entities (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     owner VARCHAR(255) NOT NULL,
///     status entity_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Entity lifecycle status
///
/// Wire format uses the capitalized names (`"Active"`, `"Pending"`,
/// `"Inactive"`); the database stores them lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entity_status", rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl EntityStatus {
    /// Wire-format name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "Active",
            EntityStatus::Pending => "Pending",
            EntityStatus::Inactive => "Inactive",
        }
    }

    /// Parses the wire-format name. Exact match; `"All"` is not a status —
    /// it is the list-endpoint sentinel for "no filter".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(EntityStatus::Active),
            "Pending" => Some(EntityStatus::Pending),
            "Inactive" => Some(EntityStatus::Inactive),
            _ => None,
        }
    }
}

/// Entity row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique entity ID
    pub id: Uuid,

    /// Owning user; immutable for the life of the row
    pub user_id: Uuid,

    /// Entity name
    pub name: String,

    /// Owner label — free text, unrelated to the user relationship
    pub owner: String,

    /// Lifecycle status
    pub status: EntityStatus,

    /// When the entity was created
    pub created_at: DateTime<Utc>,

    /// When the entity was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an entity
#[derive(Debug, Clone)]
pub struct CreateEntity {
    pub name: String,
    pub owner: String,

    /// Defaults to [`EntityStatus::Pending`] when absent
    pub status: Option<EntityStatus>,
}

/// Input for a partial update; `None` fields are preserved
#[derive(Debug, Clone, Default)]
pub struct UpdateEntity {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub status: Option<EntityStatus>,
}

/// Query shaping for the list endpoint
///
/// `status` is already resolved by the caller: the `All` sentinel and an
/// absent parameter both arrive here as `None`.
#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
    /// Case-insensitive substring match against name OR owner label
    pub search: Option<String>,

    /// Exact status filter
    pub status: Option<EntityStatus>,

    /// Field to order by; unknown values fall back to creation time
    pub sort_by: Option<String>,

    /// `asc` or `desc`; anything else means `desc`
    pub sort_order: Option<String>,
}

/// Maps a requested sort field to a column name.
///
/// ORDER BY cannot be parameterized, so only whitelisted identifiers ever
/// reach the SQL text; everything else sorts by creation time.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("name") => "name",
        Some("owner") => "owner",
        Some("status") => "status",
        Some("updatedAt") => "updated_at",
        _ => "created_at",
    }
}

fn sort_direction(sort_order: Option<&str>) -> &'static str {
    match sort_order {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

impl Entity {
    /// Creates an entity owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateEntity,
    ) -> Result<Self, sqlx::Error> {
        let entity = sqlx::query_as::<_, Entity>(
            r#"
            INSERT INTO entities (user_id, name, owner, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, owner, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.name)
        .bind(data.owner)
        .bind(data.status.unwrap_or_default())
        .fetch_one(pool)
        .await?;

        Ok(entity)
    }

    /// Fetches one entity, only if owned by `user_id`
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entity = sqlx::query_as::<_, Entity>(
            r#"
            SELECT id, user_id, name, owner, status, created_at, updated_at
            FROM entities
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(entity)
    }

    /// Lists the caller's entities with search, status filter, and sort
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        query: &EntityQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // Column and direction come from whitelists above, never from the
        // raw request.
        let sql = format!(
            r#"
            SELECT id, user_id, name, owner, status, created_at, updated_at
            FROM entities
            WHERE user_id = $1
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR owner ILIKE '%' || $2 || '%')
              AND ($3::entity_status IS NULL OR status = $3)
            ORDER BY {} {}
            "#,
            sort_column(query.sort_by.as_deref()),
            sort_direction(query.sort_order.as_deref()),
        );

        let entities = sqlx::query_as::<_, Entity>(&sql)
            .bind(user_id)
            .bind(query.search.as_deref())
            .bind(query.status)
            .fetch_all(pool)
            .await?;

        Ok(entities)
    }

    /// Applies a partial update, only if the row is owned by `user_id`
    ///
    /// Omitted fields keep their stored value. Returns `None` when the row
    /// does not exist or belongs to someone else.
    pub async fn update_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        data: UpdateEntity,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entity = sqlx::query_as::<_, Entity>(
            r#"
            UPDATE entities
            SET name = COALESCE($3, name),
                owner = COALESCE($4, owner),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, owner, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.name)
        .bind(data.owner)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(entity)
    }

    /// Deletes the entity, only if owned by `user_id`
    ///
    /// Returns whether a row was removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
