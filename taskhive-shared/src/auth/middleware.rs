/// Request authentication context
///
/// After the router's token layer validates a bearer token, it inserts an
/// [`AuthContext`] into the request extensions. Handlers extract it with
/// Axum's `Extension` extractor; everything a handler needs to scope a query
/// to the caller comes from here, never from the request body.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskhive_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::UserRole;

/// Authenticated caller identity, derived from a validated token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username at token issuance
    pub username: String,

    /// Role at token issuance
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
        }
    }
}

/// Error type for credential extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Extracts the bearer token from the Authorization header
///
/// # Errors
///
/// `MissingCredentials` when the header is absent, `InvalidFormat` when it is
/// not a `Bearer` credential.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_extract_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_context_from_claims() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::Admin);
        let ctx = AuthContext::from_claims(&claims);

        assert_eq!(ctx.user_id, claims.sub);
        assert_eq!(ctx.username, "alice");
        assert_eq!(ctx.role, UserRole::Admin);
    }
}
