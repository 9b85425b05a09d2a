/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Create account, issue token
/// - `POST /api/auth/login` - Authenticate, issue token
/// - `GET  /api/auth/profile` - Fetch own profile (token required)
///
/// Login failures are deliberately indistinguishable: an unknown email, a
/// deactivated account and a wrong password all produce the same generic
/// 401, so the endpoint cannot be used to enumerate accounts. Password
/// hashing and verification run on the blocking pool so the intentionally
/// expensive work never stalls unrelated requests.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User, UserRole, UserView},
};
use validator::{Validate, ValidationError};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username, 3-30 chars, alphanumeric plus underscore
    #[validate(
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        custom(function = "validate_username_charset")
    )]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (plaintext in transit only; hashed before storage)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for register and login: a token plus the public user view
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed session token; lifetime comes from `TOKEN_TTL_DAYS`
    pub token: String,

    /// Public view of the account
    pub user: UserView,
}

fn validate_username_charset(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_charset");
        err.message = Some("Username may only contain letters, digits and underscores".into());
        Err(err)
    }
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "email": "alice@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or username/email already exists
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    // Pre-check for a friendlier message; the unique constraints remain the
    // source of truth under concurrent registration and map to the same 400.
    if User::exists_by_username_or_email(&state.db, &username, &email).await? {
        return Err(ApiError::Conflict(
            "User with this username or email already exists".to_string(),
        ));
    }

    // Hashing is deliberately expensive; keep it off the async workers.
    let params = state.hash_params();
    let password = req.password;
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&password, &params))
            .await
            .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))??;

    let user = User::create(
        &state.db,
        CreateUser {
            username,
            email,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    let claims = jwt::Claims::with_ttl(
        user.id,
        user.username.clone(),
        user.role,
        state.token_ttl(),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Login
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "alice@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: invalid credentials (never says which part)
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();

    let invalid_credentials = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = User::find_by_email(&state.db, &email)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(invalid_credentials)?;

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let valid =
        tokio::task::spawn_blocking(move || password::verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ApiError::Internal(format!("Verification task failed: {}", e)))??;

    if !valid {
        return Err(invalid_credentials());
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = jwt::Claims::with_ttl(
        user.id,
        user.username.clone(),
        user.role,
        state.token_ttl(),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Fetch the caller's own profile
///
/// ```text
/// GET /api/auth/profile
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: missing/invalid/expired token
/// - `403 Forbidden`: account deactivated after token issuance
/// - `404 Not Found`: account removed after token issuance
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserView>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    Ok(Json(user.into()))
}
