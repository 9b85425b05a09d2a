/// Shared test harness for API integration tests
///
/// Builds the real router over a lazy connection pool. The pool never opens a
/// connection until a query runs, so tests that exercise routing, extraction,
/// and authentication run without a database. Tests that need live data are
/// gated behind `DATABASE_URL` being set.
use chrono::Duration;
use sqlx::postgres::PgPool;
use taskhive_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, HashConfig, JwtConfig},
};
use taskhive_shared::{
    auth::jwt::{create_token, Claims},
    models::user::UserRole,
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestContext {
    pub app: axum::Router,
    pub user_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/taskhive_test".to_string(),
                max_connections: 2,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                ttl_days: 7,
            },
            // Cheap parameters; these tests never hash anyway
            hash: HashConfig {
                memory_kib: 8192,
                iterations: 1,
                parallelism: 1,
            },
        };

        let db = PgPool::connect_lazy(&config.database.url)
            .unwrap_or_else(|err| panic!("lazy pool construction failed: {err}"));

        Self {
            app: build_router(AppState::new(db, config)),
            user_id: Uuid::new_v4(),
        }
    }

    /// A well-formed, correctly signed bearer header for the test user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token())
    }

    pub fn token(&self) -> String {
        let claims = Claims::new(self.user_id, "testuser".to_string(), UserRole::User);
        create_token(&claims, TEST_JWT_SECRET)
            .unwrap_or_else(|err| panic!("token creation failed: {err}"))
    }

    /// A correctly signed token whose expiry is already in the past
    pub fn expired_token(&self) -> String {
        let claims = Claims::with_ttl(
            self.user_id,
            "testuser".to_string(),
            UserRole::User,
            Duration::seconds(-3600),
        );
        create_token(&claims, TEST_JWT_SECRET)
            .unwrap_or_else(|err| panic!("token creation failed: {err}"))
    }

    /// A token signed with a different secret
    pub fn foreign_token(&self) -> String {
        let claims = Claims::new(self.user_id, "testuser".to_string(), UserRole::User);
        create_token(&claims, "some-other-secret-0123456789abcdefgh")
            .unwrap_or_else(|err| panic!("token creation failed: {err}"))
    }
}
