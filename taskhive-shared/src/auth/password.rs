/// Password hashing module using Argon2id
///
/// Hashing is deliberately expensive; the work factor is tunable via
/// [`HashParams`] so operators can trade latency for attack resistance. The
/// output is a PHC string embedding algorithm, parameters and a random
/// per-hash salt, so two hashes of the same password always differ and
/// verification needs no side channel.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::password::{hash_password, verify_password, HashParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123", &HashParams::default())?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
///
/// Defaults are the production settings: 64 MiB of memory, 3 iterations,
/// 4 lanes. Lower values are acceptable only in tests.
#[derive(Debug, Clone, Copy)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of iterations
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Hashes a password using Argon2id
///
/// The salt is 16 random bytes from the OS RNG; parameters are embedded in
/// the returned PHC string (e.g. `$argon2id$v=19$m=65536,t=3,p=4$...`).
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails.
pub fn hash_password(password: &str, params: &HashParams) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(params.memory_kib)
        .t_cost(params.iterations)
        .p_cost(params.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Parameters are read back from the PHC string, so hashes created under an
/// older work factor still verify. Comparison is constant-time.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` for a malformed hash and
/// `PasswordError::VerifyError` for other failures. A wrong password is
/// `Ok(false)`, not an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters keep the test suite fast; production uses Default.
    fn test_params() -> HashParams {
        HashParams {
            memory_kib: 8192,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_embeds_parameters() {
        let hash = hash_password("test_password_123", &test_params()).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=8192"));
        assert!(hash.contains("t=1"));
    }

    #[test]
    fn test_default_params_are_production_grade() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }

    #[test]
    fn test_same_password_different_salts() {
        let params = test_params();
        let hash1 = hash_password("same_password", &params).expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password", &params).expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password", &test_params()).expect("Hash should succeed");

        assert!(verify_password("correct_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password", &test_params()).expect("Hash should succeed");

        assert!(!verify_password("wrong_password", &hash).expect("Verify should succeed"));
        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let params = test_params();
        let passwords = vec![
            "simple",
            "with spaces",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ];

        for password in passwords {
            let hash = hash_password(password, &params).expect("Hash should succeed");
            assert!(
                verify_password(password, &hash).expect("Verify should succeed"),
                "Password '{}' should verify",
                password
            );
        }
    }
}
