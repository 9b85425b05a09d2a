//! # TaskHive API Server
//!
//! HTTP entry point for the TaskHive task manager.
//!
//! ## Startup sequence
//!
//! 1. Initialize tracing from `RUST_LOG` (or a sane default)
//! 2. Load configuration from the environment (`.env` honored)
//! 3. Connect the PostgreSQL pool and run pending migrations
//! 4. Serve the Axum router until SIGINT/SIGTERM
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhive-api
//! ```

use taskhive_api::{app, config::Config};
use taskhive_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhive_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskHive API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db_config = pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = pool::create_pool(db_config).await?;
    tracing::info!("Database pool established");

    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = app::AppState::new(db.clone(), config);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{bind_address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, draining connections...");
    pool::close_pool(db).await;

    Ok(())
}

/// Resolves on SIGINT (or SIGTERM on unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("Failed to install SIGTERM handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
