/// Session token generation and validation
///
/// Tokens are JWTs signed with HS256 and carry the caller's identity
/// (`sub` = user ID, plus username and role) so protected handlers never need
/// a server-side session. The default expiry is 7 days from issuance. The
/// signing secret is process-wide configuration loaded once at startup;
/// rotating it invalidates every outstanding token, and no revocation list is
/// kept.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskhive_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!";
///
/// let claims = Claims::new(user_id, "alice".to_string(), UserRole::User);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Default token lifetime: 7 days from issuance
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

const ISSUER: &str = "taskhive";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Token claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`) plus the username and role
/// the API needs on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Username at issuance time
    pub username: String,

    /// Role at issuance time
    pub role: UserRole,

    /// Issuer - always "taskhive"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims with the default 7-day expiry
    pub fn new(user_id: Uuid, username: String, role: UserRole) -> Self {
        Self::with_ttl(user_id, username, role, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom time-to-live
    pub fn with_ttl(user_id: Uuid, username: String, role: UserRole, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id,
            username,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Checks signature, expiry, and issuer. Any tampering yields an error;
/// claims are never partially decoded.
///
/// # Errors
///
/// Returns `JwtError::Expired` for an expired token, `JwtError::InvalidIssuer`
/// for a foreign issuer, and `JwtError::ValidationError` for anything else
/// (bad signature, malformed token).
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string(), UserRole::User);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "taskhive");
        assert!(!claims.is_expired());

        // Default expiry is 7 days out.
        let ttl = claims.exp - claims.iat;
        assert_eq!(ttl, 7 * 24 * 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "bob".to_string(), UserRole::Admin);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.username, "bob");
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.iss, "taskhive");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "another-secret-key-of-enough-length").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_ttl(
            Uuid::new_v4(),
            "alice".to_string(),
            UserRole::User,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_tampered_token() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
        let token = create_token(&claims, SECRET).expect("Should create token");

        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_validate_garbage_token() {
        assert!(validate_token("not-a-token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
