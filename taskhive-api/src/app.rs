/// Application state and router builder
///
/// Holds the two pieces of state every request shares: the database pool and
/// the immutable configuration. The state is cloned per request via Axum's
/// `State` extractor; the config rides in an `Arc` so the clone is cheap.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::auth::{
    jwt,
    middleware::{extract_bearer_token, AuthContext},
    password::HashParams,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured token lifetime
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.config.jwt.ttl_days)
    }

    /// Gets the configured password hashing work factor
    pub fn hash_params(&self) -> HashParams {
        self.config.hash.params()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                  # Liveness (public)
/// ├── /ready                   # Readiness incl. store connectivity (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register   # Public
///     │   ├── POST /login      # Public
///     │   └── GET  /profile    # Bearer token required
///     └── /tasks               # Bearer token required
///         ├── GET    /         # List own tasks (paginated + filtered)
///         ├── POST   /         # Create task
///         ├── PUT    /:id      # Update own task
///         └── DELETE /:id      # Delete own task
/// ```
///
/// Middleware stack, bottom to top: request tracing, CORS, then bearer-token
/// authentication on the protected subtrees.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Liveness and readiness (public, no auth)
    let health_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ready", get(routes::health::readiness_check));

    // Public auth routes
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Profile requires a valid token
    let profile_routes = Router::new()
        .route("/profile", get(routes::auth::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    // Task routes require a valid token
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(profile_routes))
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer-token authentication middleware
///
/// Extracts and validates the token from the Authorization header, then
/// injects an [`AuthContext`] into the request extensions. Verification is
/// pure CPU work against the process-wide secret; no store access happens
/// here.
async fn token_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = extract_bearer_token(req.headers())?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, HashConfig, JwtConfig};

    fn state_with_ttl(ttl_days: i64) -> AppState {
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
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                ttl_days,
            },
            hash: HashConfig {
                memory_kib: 8192,
                iterations: 1,
                parallelism: 1,
            },
        };

        // Lazy pool: never connects unless a query runs.
        let db = PgPool::connect_lazy(&config.database.url)
            .unwrap_or_else(|err| panic!("lazy pool construction failed: {err}"));

        AppState::new(db, config)
    }

    #[tokio::test]
    async fn test_token_ttl_follows_config() {
        let state = state_with_ttl(2);
        assert_eq!(state.token_ttl(), chrono::Duration::days(2));

        // Tokens issued against this state must expire per the configured
        // lifetime, not the library default.
        let claims = jwt::Claims::with_ttl(
            uuid::Uuid::new_v4(),
            "alice".to_string(),
            taskhive_shared::models::user::UserRole::User,
            state.token_ttl(),
        );
        assert_eq!(claims.exp - claims.iat, 2 * 24 * 3600);
    }
}
