/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing with a tunable work factor
/// - [`jwt`]: Signed session tokens (HS256, 7-day default expiry)
/// - [`middleware`]: Bearer-token extraction and the per-request auth context
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::password::{hash_password, verify_password, HashParams};
/// use taskhive_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskhive_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```
pub mod jwt;
pub mod middleware;
pub mod password;
