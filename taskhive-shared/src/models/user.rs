/// User model and database operations
///
/// Users own tasks. Usernames and emails are globally unique; a creation
/// attempt that violates either constraint fails without mutating state.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(30) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     last_login_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role
///
/// Admins carry no extra API surface today; the role travels in the token so
/// future endpoints can gate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// User model representing an account row
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the hash
/// is never serialized into a response body.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique username, 3-30 chars, alphanumeric plus underscore
    pub username: String,

    /// Unique email address, stored trimmed and lowercased
    pub email: String,

    /// Argon2id password hash (PHC string format)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Deactivated users cannot authenticate
    pub is_active: bool,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// `email` and `username` must already be normalized by the caller.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    pub role: UserRole,
}

/// Public projection of a user, safe to return to clients
///
/// Identical to [`User`] minus the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            last_login: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, is_active,
                      last_login_at, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, is_active,
                   last_login_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// The caller must lowercase the email first; storage is normalized.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, is_active,
                   last_login_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a username or email is already taken
    ///
    /// Used as the registration pre-check; the unique constraints remain the
    /// source of truth under concurrent registration.
    pub async fn exists_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            role: UserRole::User,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_default_and_str() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_serialization_excludes_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"alice\""));
    }

    #[test]
    fn test_user_view_drops_hash_and_keeps_identity() {
        let user = sample_user();
        let id = user.id;
        let view = UserView::from(user);

        assert_eq!(view.id, id);
        assert_eq!(view.username, "alice");
        assert!(view.is_active);
        assert!(view.last_login.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
        // Wire contract is camelCase
        assert!(json.get("isActive").is_some());
        assert!(json.get("createdAt").is_some());
    }

    // Database operations are exercised against a live Postgres at runtime.
}
