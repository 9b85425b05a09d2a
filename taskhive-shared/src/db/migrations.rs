/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are embedded into the binary at compile time via `sqlx::migrate!`, so a
/// deployed server carries its own schema.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::db::migrations::run_migrations;
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is
/// lost mid-migration. Failed migrations are rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    /// The embedded migrator is built at compile time; assert the schema
    /// migration is present and carries its timestamped version.
    #[test]
    fn test_embedded_migrations_present() {
        let migrator = sqlx::migrate!("../migrations");

        assert!(!migrator.migrations.is_empty());
        assert!(migrator
            .migrations
            .iter()
            .any(|m| m.description.contains("create users and tasks")));
    }
}
