/// Database models for Taskhive
///
/// # Models
///
/// - `user`: User accounts and authentication state
/// - `task`: Owner-scoped tasks with status/priority/tags
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::user::{CreateUser, User, UserRole};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// }).await?;
/// # Ok(())
/// # }
/// ```
pub mod task;
pub mod user;
