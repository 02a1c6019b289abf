/// Database models for EntityHub
///
/// # Models
///
/// - `user`: User accounts (local and federated)
/// - `entity`: Per-user business records with search/filter/sort
///
/// # Example
///
/// ```no_run
/// use entityhub_shared::models::user::{CreateUser, User};
/// use entityhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         name: Some("John Doe".to_string()),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod entity;
pub mod user;
