/// Configuration management for the API server
///
/// Configuration is loaded from environment variables once at startup into an
/// immutable `Config` that rides inside the application state. Nothing reads
/// the environment after startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `JWT_SECRET`: token signing key, at least 32 bytes (required)
/// - `TOKEN_TTL_DAYS`: token lifetime in days (default: 7)
/// - `HASH_MEMORY_KIB` / `HASH_ITERATIONS` / `HASH_PARALLELISM`: Argon2 work
///   factor (defaults: 65536 / 3 / 4)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for permissive
///   (default: `*`)
/// - `RUST_LOG`: log filter (default: info)
use serde::{Deserialize, Serialize};
use std::env;
use taskhive_shared::auth::password::HashParams;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// Password hashing work factor
    pub hash: HashConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` means permissive (development)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`.
    /// Rotating it invalidates all outstanding tokens.
    pub secret: String,

    /// Token lifetime in days
    pub ttl_days: i64,
}

/// Password hashing configuration (the tunable work factor)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashConfig {
    /// Converts to the hasher's parameter struct
    pub fn params(&self) -> HashParams {
        HashParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let ttl_days = env::var("TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<i64>()?;

        if ttl_days < 1 {
            anyhow::bail!("TOKEN_TTL_DAYS must be at least 1");
        }

        let defaults = HashParams::default();
        let hash = HashConfig {
            memory_kib: env::var("HASH_MEMORY_KIB")
                .unwrap_or_else(|_| defaults.memory_kib.to_string())
                .parse::<u32>()?,
            iterations: env::var("HASH_ITERATIONS")
                .unwrap_or_else(|_| defaults.iterations.to_string())
                .parse::<u32>()?,
            parallelism: env::var("HASH_PARALLELISM")
                .unwrap_or_else(|_| defaults.parallelism.to_string())
                .parse::<u32>()?,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                ttl_days,
            },
            hash,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                ttl_days: 7,
            },
            hash: HashConfig {
                memory_kib: 65536,
                iterations: 3,
                parallelism: 4,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_hash_config_params() {
        let params = test_config().hash.params();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }
}
