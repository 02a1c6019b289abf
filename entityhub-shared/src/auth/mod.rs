/// Authentication primitives for EntityHub
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and federated placeholder secrets
/// - [`jwt`]: Session token generation and validation
/// - [`oauth`]: OAuth 2.0 provider client (Google, GitHub)
/// - [`middleware`]: Axum middleware gating protected routes
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256-signed JWTs with a fixed 7-day expiry
/// - **Constant-time Comparison**: Password verification uses constant-time
///   operations
///
/// # Example
///
/// ```no_run
/// use entityhub_shared::auth::password::{hash_password, verify_password};
/// use entityhub_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod password;
